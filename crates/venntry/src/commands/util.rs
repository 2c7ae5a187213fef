//! Shared helpers for command handlers.

use std::future::Future;
use std::io::{self, IsTerminal};
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use uuid::Uuid;
use venntry_core::{AppContext, Query};

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Parse a resource ID argument.
pub fn parse_id(field: &str, raw: &str) -> Result<Uuid, CliError> {
    raw.trim().parse().map_err(|_| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not a valid ID"),
    })
}

/// Fail unless a user is logged in with a live session.
pub fn require_login(ctx: &AppContext) -> Result<(), CliError> {
    if ctx.auth().is_authenticated() {
        Ok(())
    } else {
        Err(CliError::NotLoggedIn)
    }
}

/// Unwrap a settled query. A query can settle with neither data nor an
/// error; `missing` says what that means for the caller's key.
pub fn settled<T>(query: Query<T>, missing: impl FnOnce() -> CliError) -> Result<T, CliError> {
    query
        .into_result()
        .map_err(|e| CliError::from(e.as_ref()))?
        .ok_or_else(missing)
}

/// A fetch whose result was dropped because the data changed meanwhile.
pub fn superseded(what: &str) -> CliError {
    CliError::Unexpected {
        message: format!("The {what} changed while loading; run the command again"),
    }
}

/// Missing data for a key scoped to the selected inventory.
pub fn selection_or_superseded(ctx: &AppContext, what: &str) -> CliError {
    if ctx.selection().current_inventory_id().is_none() {
        CliError::NoInventorySelected
    } else {
        superseded(what)
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(io::Error::other(e)))
}

/// Use the given password, or prompt for one on the terminal.
pub fn password_or_prompt(given: Option<String>) -> Result<String, CliError> {
    match given {
        Some(pw) => Ok(pw),
        None => rpassword::prompt_password("Password: ").map_err(CliError::Io),
    }
}

/// Run `fut` behind a spinner on interactive terminals.
pub async fn with_spinner<F, T>(global: &GlobalOpts, message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    if global.quiet || !io::stderr().is_terminal() {
        return fut.await;
    }

    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    let out = fut.await;
    bar.finish_and_clear();
    out
}
