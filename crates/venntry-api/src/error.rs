use std::collections::BTreeMap;

use thiserror::Error;

/// Top-level error type for the `venntry-api` crate.
///
/// Covers every failure mode of the REST client: transport, HTTP status,
/// decoding, and local upload checks. `venntry-core` maps these into
/// user-facing action errors.
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// No response reached us (connection refused, DNS failure, timeout).
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP ────────────────────────────────────────────────────────
    /// Non-2xx response. `message` comes from the server's structured
    /// error body when present, otherwise from the status line.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// Backend error type (e.g. `VALIDATION_ERROR`, `CONFLICT`).
        kind: Option<String>,
        message: String,
        field_errors: BTreeMap<String, String>,
    },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Uploads ─────────────────────────────────────────────────────
    /// The file was rejected locally before any request was made.
    #[error("Invalid upload: {reason}")]
    InvalidUpload { reason: String },
}

impl Error {
    /// Returns `true` if no HTTP response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, Self::Transport(e) if e.status().is_none())
    }

    /// HTTP status of the failed response, if there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the session credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if the server rejected the payload as invalid.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::Http { status, kind, .. } => {
                matches!(status, 400 | 422) || kind.as_deref() == Some("VALIDATION_ERROR")
            }
            Self::InvalidUpload { .. } => true,
            _ => false,
        }
    }

    /// Backend error type tag, if the server sent one.
    pub fn api_error_kind(&self) -> Option<&str> {
        match self {
            Self::Http { kind, .. } => kind.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16, kind: Option<&str>) -> Error {
        Error::Http {
            status,
            kind: kind.map(String::from),
            message: "boom".into(),
            field_errors: BTreeMap::new(),
        }
    }

    #[test]
    fn validation_detected_by_status_or_kind() {
        assert!(http(400, None).is_validation());
        assert!(http(422, None).is_validation());
        assert!(http(500, Some("VALIDATION_ERROR")).is_validation());
        assert!(!http(409, Some("CONFLICT")).is_validation());
    }

    #[test]
    fn status_helpers() {
        assert!(http(401, None).is_unauthorized());
        assert!(http(404, None).is_not_found());
        assert_eq!(http(409, None).status(), Some(409));
        assert!(!http(500, None).is_network());
    }
}
