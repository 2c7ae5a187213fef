// ── Runtime client configuration ──
//
// Describes *where* the backend lives and how to talk to it. Never touches
// disk: the CLI (via venntry-config) builds a `ClientConfig` and hands it in.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;
use venntry_api::{TlsMode, TransportConfig};

/// Deployment environment. Decides whether the session cookie is `Secure`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Self::Production
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Development => "development",
            Self::Production => "production",
        })
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            other => Err(format!(
                "unknown environment '{other}' (expected development or production)"
            )),
        }
    }
}

/// Configuration for one backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (e.g. `https://api.example.com/api`).
    pub api_url: Url,
    /// Image upload endpoint. Uploads are unavailable when unset.
    pub upload_url: Option<Url>,
    pub environment: Environment,
    /// Per-request timeout.
    pub timeout: Duration,
    pub tls: TlsMode,
}

impl ClientConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            upload_url: None,
            environment: Environment::default(),
            timeout: Duration::from_secs(30),
            tls: TlsMode::System,
        }
    }

    /// Transport settings for the HTTP client.
    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: self.tls.clone(),
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_parses_aliases() {
        assert_eq!("prod".parse::<Environment>(), Ok(Environment::Production));
        assert_eq!(
            "Development".parse::<Environment>(),
            Ok(Environment::Development)
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn environment_serializes_lowercase() {
        let json = serde_json::to_string(&Environment::Production).unwrap_or_default();
        assert_eq!(json, "\"production\"");
    }
}
