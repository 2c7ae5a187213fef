use uuid::Uuid;
use venntry_api::{Inventory, InventoryRequest};

use super::{append, remove, replace};
use crate::actions::{self, ActionResult};
use crate::cache::{Query, ResourceKey};
use crate::context::AppContext;
use crate::store::UserProfile;

/// The user's inventories and which one is selected.
#[derive(Debug, Clone)]
pub struct InventoryService {
    ctx: AppContext,
}

impl InventoryService {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn list_inventories(&self) -> Query<Vec<Inventory>> {
        self.ctx
            .cache()
            .query(Some(&ResourceKey::inventories()))
            .await
    }

    pub fn current(&self) -> Option<Inventory> {
        self.ctx.selection().current_inventory()
    }

    /// Make `inventory` the scope for product, warehouse and category reads.
    pub fn select(&self, inventory: Inventory) -> ActionResult<()> {
        Ok(self.ctx.selection().set_current_inventory(inventory)?)
    }

    /// Drop the selection.
    pub fn clear(&self) -> ActionResult<()> {
        Ok(self.ctx.selection().delete_inventory()?)
    }

    /// Create an inventory, record it on the stored profile, and optionally
    /// select it.
    pub async fn create_inventory(
        &self,
        req: &InventoryRequest,
        select: bool,
    ) -> ActionResult<Inventory> {
        let inventory = actions::create_inventory(&self.ctx, req).await?;

        append(self.ctx.cache(), &ResourceKey::inventories(), inventory.clone());
        self.update_profile(|profile| profile.inventories.push(inventory.clone()))?;
        if select {
            self.select(inventory.clone())?;
        }
        Ok(inventory)
    }

    pub async fn update_inventory(
        &self,
        id: &Uuid,
        req: &InventoryRequest,
    ) -> ActionResult<Inventory> {
        let inventory = actions::update_inventory(&self.ctx, id, req).await?;

        replace(self.ctx.cache(), &ResourceKey::inventories(), &inventory);
        self.update_profile(|profile| {
            for existing in &mut profile.inventories {
                if existing.id == inventory.id {
                    existing.clone_from(&inventory);
                }
            }
        })?;
        if self.ctx.selection().current_inventory_id() == Some(*id) {
            self.select(inventory.clone())?;
        }
        Ok(inventory)
    }

    /// Delete an inventory. If it was selected, the selection is cleared,
    /// and every cached list scoped to it is dropped.
    pub async fn delete_inventory(&self, id: &Uuid) -> ActionResult<()> {
        actions::delete_inventory(&self.ctx, id).await?;

        let cache = self.ctx.cache();
        remove::<Inventory>(cache, &ResourceKey::inventories(), id);
        for key in [
            ResourceKey::products(id),
            ResourceKey::warehouses(id),
            ResourceKey::categories(id),
        ] {
            cache.invalidate(&key);
        }

        self.update_profile(|profile| profile.inventories.retain(|inv| inv.id != *id))?;
        if self.ctx.selection().current_inventory_id() == Some(*id) {
            self.clear()?;
        }
        Ok(())
    }

    fn update_profile(&self, f: impl FnOnce(&mut UserProfile)) -> ActionResult<()> {
        if let Some(mut profile) = self.ctx.selection().user() {
            f(&mut profile);
            self.ctx.selection().set_user(profile)?;
        }
        Ok(())
    }
}
