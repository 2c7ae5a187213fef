use uuid::Uuid;
use venntry_api::{Category, Product, ProductRequest};

use super::{append, put, remove, replace};
use crate::actions::{self, ActionResult};
use crate::cache::{Query, ResourceKey};
use crate::context::AppContext;

/// Products and categories of the selected inventory.
#[derive(Debug, Clone)]
pub struct ProductService {
    ctx: AppContext,
}

impl ProductService {
    pub(crate) fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    /// `/inventories/{id}/products` for the current selection, if any.
    pub fn products_key(&self) -> Option<ResourceKey> {
        self.ctx
            .selection()
            .current_inventory_id()
            .map(|id| ResourceKey::products(&id))
    }

    pub fn categories_key(&self) -> Option<ResourceKey> {
        self.ctx
            .selection()
            .current_inventory_id()
            .map(|id| ResourceKey::categories(&id))
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub async fn get_all_products(&self) -> Query<Vec<Product>> {
        self.ctx.cache().query(self.products_key().as_ref()).await
    }

    pub async fn get_all_categories(&self) -> Query<Vec<Category>> {
        self.ctx.cache().query(self.categories_key().as_ref()).await
    }

    pub async fn get_product(&self, id: &Uuid) -> Query<Product> {
        self.ctx.cache().query(Some(&ResourceKey::product(id))).await
    }

    // ── Writes ───────────────────────────────────────────────────────

    pub async fn create_product(&self, req: &ProductRequest) -> ActionResult<Product> {
        let (products, categories) = (self.products_key(), self.categories_key());
        let product = actions::create_product(&self.ctx, req).await?;

        if let Some(key) = products {
            append(self.ctx.cache(), &key, product.clone());
        }
        // Product writes may create categories server-side.
        if let Some(key) = categories {
            self.ctx.cache().invalidate(&key);
        }
        Ok(product)
    }

    pub async fn update_product(&self, id: &Uuid, req: &ProductRequest) -> ActionResult<Product> {
        let (products, categories) = (self.products_key(), self.categories_key());
        let product = actions::update_product(&self.ctx, id, req).await?;

        if let Some(key) = products {
            replace(self.ctx.cache(), &key, &product);
        }
        if let Some(key) = categories {
            self.ctx.cache().invalidate(&key);
        }
        put(self.ctx.cache(), &ResourceKey::product(id), &product);
        Ok(product)
    }

    pub async fn delete_product(&self, id: &Uuid) -> ActionResult<()> {
        let products = self.products_key();
        actions::delete_product(&self.ctx, id).await?;

        if let Some(key) = products {
            remove::<Product>(self.ctx.cache(), &key, id);
        }
        self.ctx.cache().invalidate(&ResourceKey::product(id));
        Ok(())
    }
}
