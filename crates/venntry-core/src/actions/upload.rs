use venntry_api::{ImageFile, UploadedImage};

use super::ActionResult;
use crate::context::AppContext;
use crate::error::CoreError;

/// Upload a product image to the configured upload endpoint.
pub async fn upload_image(ctx: &AppContext, file: ImageFile) -> ActionResult<UploadedImage> {
    let Some(upload_url) = ctx.config().upload_url.as_ref() else {
        return Err(CoreError::Config {
            message: "no image upload endpoint configured (set upload_url)".into(),
        }
        .into());
    };
    Ok(ctx.client().upload_image(upload_url, file).await?)
}
