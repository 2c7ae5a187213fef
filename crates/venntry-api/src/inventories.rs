// Inventory endpoints

use tracing::debug;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Inventory, InventoryRequest};
use crate::paths;

impl ApiClient {
    /// List the caller's inventories.
    ///
    /// `GET /inventories`
    pub async fn list_inventories(&self) -> Result<Vec<Inventory>, Error> {
        self.get(paths::INVENTORIES).await
    }

    /// `GET /inventories/{id}`
    pub async fn get_inventory(&self, id: &Uuid) -> Result<Inventory, Error> {
        self.get(&paths::inventory(id)).await
    }

    /// `POST /inventories`
    pub async fn create_inventory(&self, req: &InventoryRequest) -> Result<Inventory, Error> {
        debug!(name = %req.name, "creating inventory");
        self.post(paths::INVENTORIES, req).await
    }

    /// `PUT /inventories/{id}`
    pub async fn update_inventory(
        &self,
        id: &Uuid,
        req: &InventoryRequest,
    ) -> Result<Inventory, Error> {
        debug!(%id, "updating inventory");
        self.put(&paths::inventory(id), req).await
    }

    /// Delete an inventory and everything scoped to it.
    ///
    /// `DELETE /inventories/{id}`. The body is returned as-is; the backend
    /// answers with an acknowledgement object or nothing at all.
    pub async fn delete_inventory(&self, id: &Uuid) -> Result<serde_json::Value, Error> {
        debug!(%id, "deleting inventory");
        self.delete(&paths::inventory(id)).await
    }
}
