// ── Mutation actions ──
//
// Typed create/update/delete/login/register/logout operations. Each one
// returns an `ActionResult`: the payload, or an `ActionError` that says
// what went wrong in terms a form can show. Nothing here panics or lets a
// raw transport error escape.

mod auth;
mod inventory;
mod product;
mod upload;
mod warehouse;

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use auth::{AuthenticatedUser, login_user, logout_user, register_user};
pub use inventory::{create_inventory, delete_inventory, update_inventory};
pub use product::{create_product, delete_product, update_product};
pub use upload::upload_image;
pub use warehouse::{create_warehouse, delete_warehouse, update_warehouse};

use crate::error::CoreError;
use crate::validate::ValidationErrors;

pub type ActionResult<T> = Result<T, ActionError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionErrorKind {
    /// No response from the server.
    Network,
    /// The server answered with a non-2xx status.
    Http,
    /// The input was rejected, locally or by the server.
    Validation,
    /// Durable client storage failed.
    Storage,
    Unexpected,
}

/// A failed action, normalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ActionError {
    pub kind: ActionErrorKind,
    /// Never empty.
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub field_errors: BTreeMap<String, String>,
}

const FALLBACK_MESSAGE: &str = "Something went wrong. Please try again.";

impl ActionError {
    pub fn new(kind: ActionErrorKind, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind,
            message: if message.trim().is_empty() {
                FALLBACK_MESSAGE.to_owned()
            } else {
                message
            },
            status: None,
            field_errors: BTreeMap::new(),
        }
    }

    pub fn is_validation(&self) -> bool {
        self.kind == ActionErrorKind::Validation
    }

    pub fn is_network(&self) -> bool {
        self.kind == ActionErrorKind::Network
    }
}

impl From<&CoreError> for ActionError {
    fn from(err: &CoreError) -> Self {
        let kind = match err {
            CoreError::ConnectionFailed { .. } | CoreError::Timeout => ActionErrorKind::Network,
            CoreError::AuthenticationFailed { .. } | CoreError::Api { .. } => ActionErrorKind::Http,
            CoreError::ValidationFailed { .. } | CoreError::NoInventorySelected => {
                ActionErrorKind::Validation
            }
            CoreError::Storage(_) => ActionErrorKind::Storage,
            CoreError::Decode { .. } | CoreError::Config { .. } | CoreError::Internal(_) => {
                ActionErrorKind::Unexpected
            }
        };
        let message = match err {
            // The server's own wording is what the user should see.
            CoreError::ValidationFailed { message, .. }
            | CoreError::AuthenticationFailed { message }
            | CoreError::Api { message, .. } => message.clone(),
            CoreError::NoInventorySelected => "Select an inventory first".to_owned(),
            other => other.to_string(),
        };

        let mut action = Self::new(kind, message);
        action.status = err.status();
        if let CoreError::ValidationFailed { field_errors, .. } = err {
            action.field_errors.clone_from(field_errors);
        }
        action
    }
}

impl From<CoreError> for ActionError {
    fn from(err: CoreError) -> Self {
        Self::from(&err)
    }
}

impl From<Arc<CoreError>> for ActionError {
    fn from(err: Arc<CoreError>) -> Self {
        Self::from(err.as_ref())
    }
}

impl From<venntry_api::Error> for ActionError {
    fn from(err: venntry_api::Error) -> Self {
        Self::from(CoreError::from(err))
    }
}

impl From<crate::store::StorageError> for ActionError {
    fn from(err: crate::store::StorageError) -> Self {
        Self::from(CoreError::from(err))
    }
}

impl From<ValidationErrors> for ActionError {
    fn from(errs: ValidationErrors) -> Self {
        let mut action = Self::new(ActionErrorKind::Validation, errs.to_string());
        action.field_errors = errs.into_fields();
        action
    }
}
