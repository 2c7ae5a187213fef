// ── Resource services ──
//
// One service per resource, bound to an `AppContext`. Reads go through the
// query cache under keys derived from the current selection at call time;
// writes run the matching action and then patch the cache so the next
// read reflects the change without a round-trip.

mod auth;
mod inventories;
mod products;
mod warehouses;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

pub use auth::AuthService;
pub use inventories::InventoryService;
pub use products::ProductService;
pub use warehouses::WarehouseService;

use crate::cache::{QueryCache, ResourceKey};

/// Entities addressable by id inside a cached list.
pub(crate) trait HasId {
    fn id(&self) -> Uuid;
}

impl HasId for venntry_api::Product {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for venntry_api::Warehouse {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl HasId for venntry_api::Inventory {
    fn id(&self) -> Uuid {
        self.id
    }
}

// ── List patches ─────────────────────────────────────────────────────
//
// A list that was never loaded stays unloaded, and any fetch for it that
// is still in flight is dropped. A failed patch only costs freshness, so
// it is logged rather than surfaced.

pub(crate) fn append<T>(cache: &QueryCache, key: &ResourceKey, item: T)
where
    T: Serialize + DeserializeOwned,
{
    let result = cache.mutate_with::<Vec<T>, _>(
        key,
        |list| {
            list.map(|mut list| {
                list.push(item);
                list
            })
        },
        false,
    );
    if let Err(e) = result {
        warn!(%key, error = %e, "failed to append to cached list");
    }
}

pub(crate) fn replace<T>(cache: &QueryCache, key: &ResourceKey, item: &T)
where
    T: Serialize + DeserializeOwned + HasId + Clone,
{
    let id = item.id();
    let result = cache.mutate_with::<Vec<T>, _>(
        key,
        |list| {
            list.map(|list| {
                list.into_iter()
                    .map(|existing| if existing.id() == id { item.clone() } else { existing })
                    .collect()
            })
        },
        false,
    );
    if let Err(e) = result {
        warn!(%key, error = %e, "failed to replace item in cached list");
    }
}

pub(crate) fn remove<T>(cache: &QueryCache, key: &ResourceKey, id: &Uuid)
where
    T: Serialize + DeserializeOwned + HasId,
{
    let result = cache.mutate_with::<Vec<T>, _>(
        key,
        |list| list.map(|list| list.into_iter().filter(|item| item.id() != *id).collect()),
        false,
    );
    if let Err(e) = result {
        warn!(%key, error = %e, "failed to remove item from cached list");
    }
}

/// Store a single entity under its detail key.
pub(crate) fn put<T: Serialize>(cache: &QueryCache, key: &ResourceKey, item: &T) {
    if let Err(e) = cache.mutate(key, item, false) {
        warn!(%key, error = %e, "failed to update cached entry");
    }
}
