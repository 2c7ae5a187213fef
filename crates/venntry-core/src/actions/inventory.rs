use tracing::debug;
use uuid::Uuid;
use venntry_api::{Inventory, InventoryRequest};

use super::ActionResult;
use crate::context::AppContext;

pub async fn create_inventory(ctx: &AppContext, req: &InventoryRequest) -> ActionResult<Inventory> {
    Ok(ctx.client().create_inventory(req).await?)
}

pub async fn update_inventory(
    ctx: &AppContext,
    id: &Uuid,
    req: &InventoryRequest,
) -> ActionResult<Inventory> {
    Ok(ctx.client().update_inventory(id, req).await?)
}

pub async fn delete_inventory(ctx: &AppContext, id: &Uuid) -> ActionResult<()> {
    let ack = ctx.client().delete_inventory(id).await?;
    debug!(%id, ?ack, "inventory deleted");
    Ok(())
}
