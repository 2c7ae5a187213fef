//! Configuration for the venntry CLI.
//!
//! One TOML file at the platform config path, overridden by `VENNTRY_*`
//! environment variables, translated into a `venntry_core::ClientConfig`.
//! The CLI layers its own flags (`--api-url`, `--timeout`, `--data-dir`)
//! on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use venntry_core::api::TlsMode;
use venntry_core::{ClientConfig, Environment};

/// Environment variable prefix, e.g. `VENNTRY_API_URL`.
pub const ENV_PREFIX: &str = "VENNTRY_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no API URL configured")]
    MissingApiUrl,

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config ─────────────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Backend API base URL (e.g. "https://api.example.com/api").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Image upload endpoint. Uploads are disabled when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upload_url: Option<String>,

    #[serde(default)]
    pub environment: Environment,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Extra CA certificate (PEM) to trust.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Where the session and selection are persisted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            upload_url: None,
            environment: Environment::default(),
            timeout: default_timeout(),
            ca_cert: None,
            data_dir: None,
        }
    }
}

fn default_timeout() -> u64 {
    30
}

impl Config {
    /// The configured data directory, or the platform default.
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }

    /// Validate and translate into a `ClientConfig`.
    ///
    /// Fails on a missing or malformed URL, a zero timeout, or a CA file
    /// that does not exist, so nothing is sent with a broken setup.
    pub fn to_client_config(&self) -> Result<ClientConfig, ConfigError> {
        let raw = self
            .api_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::MissingApiUrl)?;
        let api_url = parse_http_url("api_url", raw)?;

        let upload_url = self
            .upload_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .map(|u| parse_http_url("upload_url", u))
            .transpose()?;

        if self.timeout == 0 {
            return Err(ConfigError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }

        let tls = match &self.ca_cert {
            Some(path) if !path.is_file() => {
                return Err(ConfigError::Validation {
                    field: "ca_cert".into(),
                    reason: format!("file not found: {}", path.display()),
                });
            }
            Some(path) => TlsMode::CustomCa(path.clone()),
            None => TlsMode::System,
        };

        Ok(ClientConfig {
            api_url,
            upload_url,
            environment: self.environment,
            timeout: Duration::from_secs(self.timeout),
            tls,
        })
    }
}

fn parse_http_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation {
            field: field.into(),
            reason: format!("expected an http(s) URL, got '{raw}'"),
        });
    }
    Ok(url)
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "venntry", "venntry")
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory for persisted client state.
pub fn default_data_dir() -> PathBuf {
    project_dirs().map_or_else(
        || home_fallback(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn home_fallback(sub: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(sub);
    p.push("venntry");
    p
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load the Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load the Config from `path` + environment. A missing file yields the
/// defaults.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX));

    Ok(figment.extract()?)
}

/// Load config, falling back to defaults on any error.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Write config as pretty TOML to the canonical path. Returns the path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn with_url(url: &str) -> Config {
        Config {
            api_url: Some(url.into()),
            ..Config::default()
        }
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.environment, Environment::Development);
    }

    #[test]
    fn file_values_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "api_url = \"https://api.example.com/api\"\n\
             environment = \"production\"\n\
             timeout = 5\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.api_url.as_deref(), Some("https://api.example.com/api"));
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.timeout, 5);
        assert_eq!(cfg.upload_url, None);
    }

    #[test]
    fn save_then_load_keeps_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let cfg = Config {
            upload_url: Some("https://upload.example.com/image".into()),
            data_dir: Some(dir.path().join("data")),
            ..with_url("https://api.example.com/api")
        };

        save_config_to(&cfg, &path).unwrap();
        assert_eq!(load_config_from(&path).unwrap(), cfg);
    }

    #[test]
    fn client_config_requires_api_url() {
        assert!(matches!(
            Config::default().to_client_config(),
            Err(ConfigError::MissingApiUrl)
        ));
        assert!(matches!(
            with_url("  ").to_client_config(),
            Err(ConfigError::MissingApiUrl)
        ));
    }

    #[test]
    fn client_config_rejects_bad_urls() {
        let err = with_url("not a url").to_client_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));

        let err = with_url("ftp://files.example.com").to_client_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "api_url"));

        let cfg = Config {
            upload_url: Some("nope".into()),
            ..with_url("https://api.example.com/api")
        };
        let err = cfg.to_client_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "upload_url"));
    }

    #[test]
    fn client_config_rejects_missing_ca_and_zero_timeout() {
        let cfg = Config {
            ca_cert: Some(PathBuf::from("/nonexistent/venntry-ca.pem")),
            ..with_url("https://api.example.com/api")
        };
        assert!(matches!(
            cfg.to_client_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "ca_cert"
        ));

        let cfg = Config {
            timeout: 0,
            ..with_url("https://api.example.com/api")
        };
        assert!(matches!(
            cfg.to_client_config(),
            Err(ConfigError::Validation { ref field, .. }) if field == "timeout"
        ));
    }

    #[test]
    fn client_config_translates_fields() {
        let dir = tempfile::tempdir().unwrap();
        let ca = dir.path().join("ca.pem");
        std::fs::write(&ca, "pem").unwrap();

        let cfg = Config {
            upload_url: Some("https://upload.example.com/image".into()),
            environment: Environment::Production,
            timeout: 12,
            ca_cert: Some(ca.clone()),
            ..with_url("https://api.example.com/api")
        };
        let client = cfg.to_client_config().unwrap();

        assert_eq!(client.api_url.as_str(), "https://api.example.com/api");
        assert_eq!(
            client.upload_url.map(String::from).as_deref(),
            Some("https://upload.example.com/image")
        );
        assert_eq!(client.environment, Environment::Production);
        assert_eq!(client.timeout, Duration::from_secs(12));
        assert_eq!(client.tls, TlsMode::CustomCa(ca));
    }

    #[test]
    fn data_dir_prefers_configured_path() {
        let cfg = Config {
            data_dir: Some(PathBuf::from("/var/lib/venntry")),
            ..Config::default()
        };
        assert_eq!(cfg.data_dir(), PathBuf::from("/var/lib/venntry"));
        assert_eq!(Config::default().data_dir(), default_data_dir());
    }
}
