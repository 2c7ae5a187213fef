// Product and category endpoints
//
// Products and categories are listed per inventory; single products are
// addressed by id. Categories are created implicitly by product writes.

use tracing::debug;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Category, Product, ProductRequest};
use crate::paths;

impl ApiClient {
    /// `GET /inventories/{inventory_id}/products`
    pub async fn list_products(&self, inventory_id: &Uuid) -> Result<Vec<Product>, Error> {
        self.get(&paths::inventory_products(inventory_id)).await
    }

    /// `GET /inventories/{inventory_id}/categories`
    pub async fn list_categories(&self, inventory_id: &Uuid) -> Result<Vec<Category>, Error> {
        self.get(&paths::inventory_categories(inventory_id)).await
    }

    /// `GET /products/{id}`
    pub async fn get_product(&self, id: &Uuid) -> Result<Product, Error> {
        self.get(&paths::product(id)).await
    }

    /// Create a product inside an inventory.
    ///
    /// `POST /inventories/{inventory_id}/products`
    pub async fn create_product(
        &self,
        inventory_id: &Uuid,
        req: &ProductRequest,
    ) -> Result<Product, Error> {
        debug!(%inventory_id, sku = %req.sku, "creating product");
        self.post(&paths::inventory_products(inventory_id), req).await
    }

    /// `PUT /products/{id}`
    pub async fn update_product(&self, id: &Uuid, req: &ProductRequest) -> Result<Product, Error> {
        debug!(%id, "updating product");
        self.put(&paths::product(id), req).await
    }

    /// `DELETE /products/{id}`
    pub async fn delete_product(&self, id: &Uuid) -> Result<serde_json::Value, Error> {
        debug!(%id, "deleting product");
        self.delete(&paths::product(id)).await
    }
}
