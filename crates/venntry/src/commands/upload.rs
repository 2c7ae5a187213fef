//! Image upload handler.

use venntry_core::api::ImageFile;
use venntry_core::{ActionError, AppContext, actions};

use crate::cli::{GlobalOpts, UploadArgs};
use crate::error::CliError;
use crate::output;

use super::util;

pub async fn handle(
    ctx: &AppContext,
    args: UploadArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    util::require_login(ctx)?;

    let file = ImageFile::from_path(&args.file).map_err(ActionError::from)?;
    let uploaded = util::with_spinner(
        global,
        &format!("Uploading {}", args.file.display()),
        actions::upload_image(ctx, file),
    )
    .await?;

    let out = output::render_single(
        global.output,
        &uploaded,
        |u| output::detail(&[("URL", u.url.clone()), ("File key", u.file_key.clone())]),
        |u| u.url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
