use tracing::debug;
use uuid::Uuid;
use venntry_api::{Product, ProductRequest};

use super::ActionResult;
use crate::context::AppContext;
use crate::error::CoreError;

/// Create a product in the currently selected inventory.
pub async fn create_product(ctx: &AppContext, req: &ProductRequest) -> ActionResult<Product> {
    let inventory_id = ctx
        .selection()
        .current_inventory_id()
        .ok_or(CoreError::NoInventorySelected)?;
    Ok(ctx.client().create_product(&inventory_id, req).await?)
}

pub async fn update_product(
    ctx: &AppContext,
    id: &Uuid,
    req: &ProductRequest,
) -> ActionResult<Product> {
    Ok(ctx.client().update_product(id, req).await?)
}

pub async fn delete_product(ctx: &AppContext, id: &Uuid) -> ActionResult<()> {
    let ack = ctx.client().delete_product(id).await?;
    debug!(%id, ?ack, "product deleted");
    Ok(())
}
