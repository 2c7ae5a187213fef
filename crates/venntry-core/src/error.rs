// ── Core error types ──
//
// Domain errors from venntry-core. Consumers see these (or the
// `ActionError` built from them), never raw transport errors. The
// `From<venntry_api::Error>` impl does the translation.

use std::collections::BTreeMap;

use thiserror::Error;

use crate::store::StorageError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot reach the server at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    // ── Auth errors ──────────────────────────────────────────────────
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("No inventory selected")]
    NoInventorySelected,

    #[error("Validation failed: {message}")]
    ValidationFailed {
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ── API errors (wrapped, not exposed raw) ────────────────────────
    #[error("{message}")]
    Api {
        message: String,
        /// Backend error type (e.g. `CONFLICT`, `NOT_FOUND`).
        kind: Option<String>,
        status: Option<u16>,
    },

    // ── Local errors ─────────────────────────────────────────────────
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// No response was received from the server.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout)
    }

    /// HTTP status of the failed response, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::AuthenticationFailed { .. } => Some(401),
            _ => None,
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<venntry_api::Error> for CoreError {
    fn from(err: venntry_api::Error) -> Self {
        let validation = err.is_validation();
        match err {
            venntry_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Api {
                        message: e.to_string(),
                        kind: None,
                        status: Some(status.as_u16()),
                    }
                } else {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            venntry_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            venntry_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
            venntry_api::Error::Http {
                message,
                field_errors,
                ..
            } if validation => CoreError::ValidationFailed {
                message,
                field_errors,
            },
            venntry_api::Error::Http {
                status: 401,
                message,
                ..
            } => CoreError::AuthenticationFailed { message },
            venntry_api::Error::Http {
                status,
                kind,
                message,
                ..
            } => CoreError::Api {
                message,
                kind,
                status: Some(status),
            },
            venntry_api::Error::Deserialization { message, body: _ } => {
                CoreError::Decode { message }
            }
            venntry_api::Error::InvalidUpload { reason } => CoreError::ValidationFailed {
                field_errors: BTreeMap::from([("file".to_owned(), reason.clone())]),
                message: reason,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, kind: Option<&str>) -> venntry_api::Error {
        venntry_api::Error::Http {
            status,
            kind: kind.map(String::from),
            message: "server said no".into(),
            field_errors: BTreeMap::new(),
        }
    }

    #[test]
    fn validation_status_maps_to_validation_failed() {
        let err = CoreError::from(http(422, None));
        assert!(matches!(
            err,
            CoreError::ValidationFailed { ref message, .. } if message == "server said no"
        ));
    }

    #[test]
    fn unauthorized_maps_to_auth_failure() {
        let err = CoreError::from(http(401, Some("UNAUTHORIZED")));
        assert!(matches!(err, CoreError::AuthenticationFailed { .. }));
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn other_statuses_keep_kind_and_status() {
        let err = CoreError::from(http(409, Some("CONFLICT")));
        match err {
            CoreError::Api { kind, status, .. } => {
                assert_eq!(kind.as_deref(), Some("CONFLICT"));
                assert_eq!(status, Some(409));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn invalid_upload_is_a_field_error() {
        let err = CoreError::from(venntry_api::Error::InvalidUpload {
            reason: "too big".into(),
        });
        match err {
            CoreError::ValidationFailed { field_errors, .. } => {
                assert_eq!(field_errors.get("file").map(String::as_str), Some("too big"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
