// Warehouse endpoints

use tracing::debug;
use uuid::Uuid;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Warehouse, WarehouseRequest};
use crate::paths;

impl ApiClient {
    /// `GET /inventories/{inventory_id}/warehouses`
    pub async fn list_warehouses(&self, inventory_id: &Uuid) -> Result<Vec<Warehouse>, Error> {
        self.get(&paths::inventory_warehouses(inventory_id)).await
    }

    /// Fetch one warehouse, including the products stored in it.
    ///
    /// `GET /warehouses/{id}`
    pub async fn get_warehouse(&self, id: &Uuid) -> Result<Warehouse, Error> {
        self.get(&paths::warehouse(id)).await
    }

    /// `POST /inventories/{inventory_id}/warehouses`
    pub async fn create_warehouse(
        &self,
        inventory_id: &Uuid,
        req: &WarehouseRequest,
    ) -> Result<Warehouse, Error> {
        debug!(%inventory_id, name = %req.name, "creating warehouse");
        self.post(&paths::inventory_warehouses(inventory_id), req).await
    }

    /// `PUT /warehouses/{id}`
    pub async fn update_warehouse(
        &self,
        id: &Uuid,
        req: &WarehouseRequest,
    ) -> Result<Warehouse, Error> {
        debug!(%id, "updating warehouse");
        self.put(&paths::warehouse(id), req).await
    }

    /// `DELETE /warehouses/{id}`
    pub async fn delete_warehouse(&self, id: &Uuid) -> Result<serde_json::Value, Error> {
        debug!(%id, "deleting warehouse");
        self.delete(&paths::warehouse(id)).await
    }
}
