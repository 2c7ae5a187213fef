use std::fmt;

use uuid::Uuid;
use venntry_api::paths;

/// Cache key: the resource path the data is fetched from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(String);

impl ResourceKey {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn inventories() -> Self {
        Self::new(paths::INVENTORIES)
    }

    pub fn products(inventory_id: &Uuid) -> Self {
        Self(paths::inventory_products(inventory_id))
    }

    pub fn categories(inventory_id: &Uuid) -> Self {
        Self(paths::inventory_categories(inventory_id))
    }

    pub fn warehouses(inventory_id: &Uuid) -> Self {
        Self(paths::inventory_warehouses(inventory_id))
    }

    pub fn product(id: &Uuid) -> Self {
        Self(paths::product(id))
    }

    pub fn warehouse(id: &Uuid) -> Self {
        Self(paths::warehouse(id))
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ResourceKey {
    fn from(path: String) -> Self {
        Self(path)
    }
}
