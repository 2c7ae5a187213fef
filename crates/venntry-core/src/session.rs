// ── Session credential ──
//
// The login token lives in a cookie-shaped record: name `session`,
// HttpOnly, SameSite=Strict, seven-day lifetime, and Secure only in
// production. `SessionJar` keeps the current one in durable storage.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, TimeDelta, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::{debug, warn};

use crate::config::Environment;
use crate::store::{KeyValueStore, StorageError};

/// Cookie name, also the storage key of the persisted credential.
pub const SESSION_COOKIE_NAME: &str = "session";

/// One week.
pub const SESSION_MAX_AGE_SECS: i64 = 60 * 60 * 24 * 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Strict => "Strict",
            Self::Lax => "Lax",
            Self::None => "None",
        })
    }
}

fn expose_token<S: Serializer>(token: &SecretString, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(token.expose_secret())
}

fn token_from_string<'de, D: Deserializer<'de>>(d: D) -> Result<SecretString, D::Error> {
    String::deserialize(d).map(SecretString::from)
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionCookie {
    pub name: String,
    #[serde(serialize_with = "expose_token", deserialize_with = "token_from_string")]
    token: SecretString,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub max_age_secs: i64,
    pub path: String,
    pub issued_at: DateTime<Utc>,
}

impl SessionCookie {
    /// The cookie set after a successful login.
    pub fn issue(token: SecretString, environment: Environment, now: DateTime<Utc>) -> Self {
        Self {
            name: SESSION_COOKIE_NAME.to_owned(),
            token,
            http_only: true,
            secure: environment.is_production(),
            same_site: SameSite::Strict,
            max_age_secs: SESSION_MAX_AGE_SECS,
            path: "/".to_owned(),
            issued_at: now,
        }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        TimeDelta::try_seconds(self.max_age_secs)
            .and_then(|age| self.issued_at.checked_add_signed(age))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at()
    }

    /// `Set-Cookie` header value. Contains the token; do not log it.
    pub fn set_cookie_header(&self) -> String {
        let mut header = format!(
            "{}={}; Path={}; Max-Age={}",
            self.name,
            self.token.expose_secret(),
            self.path,
            self.max_age_secs
        );
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        if self.secure {
            header.push_str("; Secure");
        }
        header.push_str("; SameSite=");
        header.push_str(&self.same_site.to_string());
        header
    }

    /// `Set-Cookie` header value that deletes the cookie.
    pub fn removal_header() -> String {
        format!("{SESSION_COOKIE_NAME}=; Path=/; Max-Age=0")
    }
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("token", &"[REDACTED]")
            .field("http_only", &self.http_only)
            .field("secure", &self.secure)
            .field("same_site", &self.same_site)
            .field("max_age_secs", &self.max_age_secs)
            .field("path", &self.path)
            .field("issued_at", &self.issued_at)
            .finish()
    }
}

// ── Jar ──────────────────────────────────────────────────────────────

/// Holds the current session cookie, mirrored to durable storage under
/// the `session` key. Expired cookies read as absent.
pub struct SessionJar {
    storage: Arc<dyn KeyValueStore>,
    current: ArcSwapOption<SessionCookie>,
}

impl SessionJar {
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let cookie = match storage.get(SESSION_COOKIE_NAME) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionCookie>(&raw) {
                Ok(cookie) if cookie.is_expired(Utc::now()) => {
                    debug!("stored session expired");
                    None
                }
                Ok(cookie) => Some(Arc::new(cookie)),
                Err(e) => {
                    warn!(error = %e, "ignoring unreadable stored session");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "failed to read stored session");
                None
            }
        };

        Self {
            storage,
            current: ArcSwapOption::new(cookie),
        }
    }

    /// The live cookie, if any.
    pub fn current(&self) -> Option<Arc<SessionCookie>> {
        self.current
            .load_full()
            .filter(|c| !c.is_expired(Utc::now()))
    }

    /// A copy of the live token.
    pub fn token(&self) -> Option<SecretString> {
        self.current()
            .map(|c| SecretString::from(c.token().expose_secret().to_owned()))
    }

    pub fn is_present(&self) -> bool {
        self.current().is_some()
    }

    /// Persist `cookie`, then make it current.
    pub fn store(&self, cookie: SessionCookie) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&cookie)?;
        self.storage.set(SESSION_COOKIE_NAME, &raw)?;
        self.current.store(Some(Arc::new(cookie)));
        Ok(())
    }

    /// Drop the cookie. The in-memory copy goes first and stays gone even
    /// if removing the stored copy fails.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.current.store(None);
        self.storage.remove(SESSION_COOKIE_NAME)
    }
}

impl fmt::Debug for SessionJar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionJar")
            .field("present", &self.is_present())
            .finish_non_exhaustive()
    }
}
