use tracing::warn;
use uuid::Uuid;
use venntry_api::{Warehouse, WarehouseRequest};

use super::{append, remove, replace};
use crate::actions::{self, ActionResult};
use crate::cache::{Query, ResourceKey};
use crate::context::AppContext;

/// Warehouses of the selected inventory.
#[derive(Debug, Clone)]
pub struct WarehouseService {
    ctx: AppContext,
}

impl WarehouseService {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// `/inventories/{id}/warehouses` for the current selection, if any.
    pub fn warehouses_key(&self) -> Option<ResourceKey> {
        self.ctx
            .selection()
            .current_inventory_id()
            .map(|id| ResourceKey::warehouses(&id))
    }

    pub async fn get_all_warehouses(&self) -> Query<Vec<Warehouse>> {
        self.ctx.cache().query(self.warehouses_key().as_ref()).await
    }

    pub async fn get_warehouse(&self, id: &Uuid) -> Query<Warehouse> {
        self.ctx.cache().query(Some(&ResourceKey::warehouse(id))).await
    }

    pub async fn create_warehouse(&self, req: &WarehouseRequest) -> ActionResult<Warehouse> {
        let key = self.warehouses_key();
        let warehouse = actions::create_warehouse(&self.ctx, req).await?;
        if let Some(key) = key {
            append(self.ctx.cache(), &key, warehouse.clone());
        }
        Ok(warehouse)
    }

    /// Update in place. The cached list and detail entry are patched
    /// optimistically; nothing is reloaded.
    pub async fn update_warehouse(
        &self,
        id: &Uuid,
        req: &WarehouseRequest,
    ) -> ActionResult<Warehouse> {
        let key = self.warehouses_key();
        let warehouse = actions::update_warehouse(&self.ctx, id, req).await?;
        if let Some(key) = key {
            replace(self.ctx.cache(), &key, &warehouse);
        }
        self.patch_detail(&warehouse);
        Ok(warehouse)
    }

    pub async fn delete_warehouse(&self, id: &Uuid) -> ActionResult<()> {
        let key = self.warehouses_key();
        actions::delete_warehouse(&self.ctx, id).await?;
        if let Some(key) = key {
            remove::<Warehouse>(self.ctx.cache(), &key, id);
        }
        self.ctx.cache().invalidate(&ResourceKey::warehouse(id));
        Ok(())
    }

    /// Copy updated fields into a cached detail entry. The update response
    /// may omit the stocked products, so cached ones are kept in that case.
    fn patch_detail(&self, updated: &Warehouse) {
        let key = ResourceKey::warehouse(&updated.id);
        let result = self.ctx.cache().mutate_with::<Warehouse, _>(
            &key,
            |cached| {
                cached.map(|cached| Warehouse {
                    products: if updated.products.is_empty() {
                        cached.products
                    } else {
                        updated.products.clone()
                    },
                    ..updated.clone()
                })
            },
            false,
        );
        if let Err(e) = result {
            warn!(%key, error = %e, "failed to patch cached warehouse");
        }
    }
}
