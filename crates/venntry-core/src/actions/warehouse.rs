use tracing::debug;
use uuid::Uuid;
use venntry_api::{Warehouse, WarehouseRequest};

use super::ActionResult;
use crate::context::AppContext;
use crate::error::CoreError;

/// Create a warehouse in the currently selected inventory.
pub async fn create_warehouse(ctx: &AppContext, req: &WarehouseRequest) -> ActionResult<Warehouse> {
    let inventory_id = ctx
        .selection()
        .current_inventory_id()
        .ok_or(CoreError::NoInventorySelected)?;
    Ok(ctx.client().create_warehouse(&inventory_id, req).await?)
}

pub async fn update_warehouse(
    ctx: &AppContext,
    id: &Uuid,
    req: &WarehouseRequest,
) -> ActionResult<Warehouse> {
    Ok(ctx.client().update_warehouse(id, req).await?)
}

pub async fn delete_warehouse(ctx: &AppContext, id: &Uuid) -> ActionResult<()> {
    let ack = ctx.client().delete_warehouse(id).await?;
    debug!(%id, ?ack, "warehouse deleted");
    Ok(())
}
