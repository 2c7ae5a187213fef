//! CLI error types with miette diagnostics.
//!
//! Maps action, core and config errors into user-facing errors with
//! actionable help text and a stable exit code.

use miette::Diagnostic;
use thiserror::Error;

use venntry_config::ConfigError;
use venntry_core::{ActionError, ActionErrorKind, CoreError, ValidationErrors};

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the server: {message}")]
    #[diagnostic(
        code(venntry::network),
        help(
            "Check that the API is running and reachable.\n\
             Set it with --api-url or `venntry config init`."
        )
    )]
    Network { message: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    #[diagnostic(code(venntry::auth_failed), help("Run: venntry auth login --email <EMAIL>"))]
    AuthFailed { message: String },

    #[error("Not logged in")]
    #[diagnostic(code(venntry::not_logged_in), help("Run: venntry auth login --email <EMAIL>"))]
    NotLoggedIn,

    #[error("Access to {path} denied; redirected to {redirect}")]
    #[diagnostic(
        code(venntry::session_rejected),
        help("The stored session was removed. Run: venntry auth login --email <EMAIL>")
    )]
    SessionRejected { path: String, redirect: String },

    // ── Selection ────────────────────────────────────────────────────
    #[error("No inventory selected")]
    #[diagnostic(
        code(venntry::no_inventory),
        help("Run: venntry inventories list, then venntry inventories select <ID>")
    )]
    NoInventorySelected,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(code(venntry::not_found))]
    NotFound { message: String },

    #[error("{message}")]
    #[diagnostic(code(venntry::conflict))]
    Conflict { message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(venntry::api_error))]
    Api { status: u16, message: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(venntry::validation))]
    Validation { field: String, reason: String },

    #[error("{message}")]
    #[diagnostic(code(venntry::invalid_input), help("{details}"))]
    InvalidInput { message: String, details: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("No API URL configured")]
    #[diagnostic(
        code(venntry::no_config),
        help(
            "Pass --api-url, set VENNTRY_API_URL, or run: venntry config init\n\
             Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(venntry::config))]
    Config { message: String },

    // ── Local state ──────────────────────────────────────────────────
    #[error("Could not save local state: {message}")]
    #[diagnostic(code(venntry::storage), help("Check permissions on the data directory."))]
    Storage { message: String },

    #[error("{message}")]
    #[diagnostic(code(venntry::unexpected))]
    Unexpected { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(venntry::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Network { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } | Self::NotLoggedIn | Self::SessionRejected { .. } => {
                exit_code::AUTH
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::InvalidInput { .. }
            | Self::NoInventorySelected
            | Self::NoConfig { .. }
            | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

fn describe_fields(errors: &std::collections::BTreeMap<String, String>) -> String {
    errors
        .iter()
        .map(|(field, msg)| format!("{field}: {msg}"))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── ActionError → CliError mapping ───────────────────────────────────

impl From<ActionError> for CliError {
    fn from(err: ActionError) -> Self {
        match err.kind {
            ActionErrorKind::Network => Self::Network {
                message: err.message,
            },
            ActionErrorKind::Http => match err.status {
                Some(401) => Self::AuthFailed {
                    message: err.message,
                },
                Some(404) => Self::NotFound {
                    message: err.message,
                },
                Some(409) => Self::Conflict {
                    message: err.message,
                },
                status => Self::Api {
                    status: status.unwrap_or_default(),
                    message: err.message,
                },
            },
            ActionErrorKind::Validation => Self::InvalidInput {
                details: if err.field_errors.is_empty() {
                    "Check the values and try again.".into()
                } else {
                    describe_fields(&err.field_errors)
                },
                message: err.message,
            },
            ActionErrorKind::Storage => Self::Storage {
                message: err.message,
            },
            ActionErrorKind::Unexpected => Self::Unexpected {
                message: err.message,
            },
        }
    }
}

impl From<ValidationErrors> for CliError {
    fn from(err: ValidationErrors) -> Self {
        ActionError::from(err).into()
    }
}

impl From<&CoreError> for CliError {
    fn from(err: &CoreError) -> Self {
        match err {
            CoreError::NoInventorySelected => Self::NoInventorySelected,
            other => ActionError::from(other).into(),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingApiUrl => Self::NoConfig {
                path: venntry_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => Self::Validation { field, reason },
            ConfigError::Io(e) => Self::Io(e),
            other => Self::Config {
                message: other.to_string(),
            },
        }
    }
}
