//! Command dispatch: bridges CLI args -> core services -> output formatting.

pub mod auth;
pub mod categories;
pub mod config_cmd;
pub mod inventories;
pub mod products;
pub mod upload;
pub mod util;
pub mod warehouses;

use venntry_core::AppContext;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    ctx: &AppContext,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Auth(args) => auth::handle(ctx, args, global).await,
        Command::Inventories(args) => inventories::handle(ctx, args, global).await,
        Command::Products(args) => products::handle(ctx, args, global).await,
        Command::Categories(args) => categories::handle(ctx, args, global).await,
        Command::Warehouses(args) => warehouses::handle(ctx, args, global).await,
        Command::Upload(args) => upload::handle(ctx, args, global).await,
        // Config and Completions are handled before a context exists
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
