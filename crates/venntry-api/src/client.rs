// REST API HTTP client
//
// Wraps `reqwest::Client` with base-URL joining, bearer credential
// injection, and uniform error parsing. Endpoint groups (auth, products,
// warehouses, ...) are inherent methods in sibling modules so this file
// stays focused on transport mechanics.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

// ── Error response shape from the backend ────────────────────────────

/// The backend answers failures with `{"type","message","code"}`; the
/// upload and token endpoints use `{"error": "..."}`.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "fieldErrors", alias = "errors")]
    field_errors: Option<BTreeMap<String, String>>,
}

// ── Raw response ─────────────────────────────────────────────────────

/// A successful (2xx) response with its body fully read.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl RawResponse {
    /// Decode the body as JSON. An empty body decodes as JSON `null`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        let bytes: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(bytes).map_err(|e| {
            let body = String::from_utf8_lossy(&self.body).into_owned();
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body,
            }
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the Venntry backend.
///
/// Cheap to clone: the HTTP pool and the credential slot are shared, so
/// installing a credential on one clone is visible to all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credential: Arc<ArcSwapOption<SecretString>>,
}

impl fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("authenticated", &self.has_credential())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client from a base URL (e.g. `https://api.example.com/api`)
    /// and transport settings.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            credential: Arc::new(ArcSwapOption::empty()),
        }
    }

    /// The API base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client (for the upload flow).
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── Credential management ────────────────────────────────────────

    /// Install or remove the bearer credential used on every request.
    pub fn set_credential(&self, token: Option<SecretString>) {
        match token {
            Some(token) => {
                debug!("installing session credential");
                self.credential.store(Some(Arc::new(token)));
            }
            None => {
                debug!("removing session credential");
                self.credential.store(None);
            }
        }
    }

    pub fn has_credential(&self) -> bool {
        self.credential.load().is_some()
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join an API path (e.g. `/products/{id}`) onto the base URL,
    /// keeping any path prefix the base URL carries.
    pub fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send a request with an optional JSON body and return the raw
    /// response. Non-2xx statuses become [`Error::Http`].
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(builder).await
    }

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url}");

        self.send(self.http.get(url)).await?.json()
    }

    /// GET with an explicit bearer token, bypassing the installed one.
    pub(crate) async fn get_with_token<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} (explicit token)");

        let resp = self
            .http
            .get(url)
            .bearer_auth(token.expose_secret())
            .send()
            .await?;
        Self::into_raw(resp).await?.json()
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        self.send(self.http.post(url).json(body)).await?.json()
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        self.send(self.http.put(url).json(body)).await?.json()
    }

    pub(crate) async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        self.send(self.http.delete(url)).await?.json()
    }

    // ── Response handling ────────────────────────────────────────────

    /// Attach the installed credential, send, and read the body.
    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<RawResponse, Error> {
        let builder = match self.credential.load_full() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        };
        let resp = builder.send().await?;
        Self::into_raw(resp).await
    }

    pub(crate) async fn into_raw(resp: reqwest::Response) -> Result<RawResponse, Error> {
        let status = resp.status();
        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }
        let headers = resp.headers().clone();
        let body = resp.bytes().await?;
        trace!(%status, len = body.len(), "response received");
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let parsed = serde_json::from_str::<ErrorBody>(&raw).ok();

        let (kind, message, field_errors) = match parsed {
            Some(body) => (
                body.kind,
                body.message.or(body.error).filter(|m| !m.trim().is_empty()),
                body.field_errors.unwrap_or_default(),
            ),
            None => {
                debug!(%status, body = %raw, "unstructured error body");
                (None, None, BTreeMap::new())
            }
        };

        Error::Http {
            status: status.as_u16(),
            kind,
            message: message.unwrap_or_else(|| format!("Request failed with status {status}")),
            field_errors,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::with_client(reqwest::Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn url_keeps_base_prefix() {
        let c = client("https://api.example.com/api/");
        assert_eq!(
            c.url("/products/1").unwrap().as_str(),
            "https://api.example.com/api/products/1"
        );
        let c = client("https://api.example.com/api");
        assert_eq!(
            c.url("inventories").unwrap().as_str(),
            "https://api.example.com/api/inventories"
        );
    }

    #[test]
    fn credential_is_shared_between_clones() {
        let a = client("https://api.example.com");
        let b = a.clone();
        a.set_credential(Some(SecretString::from("tok".to_string())));
        assert!(b.has_credential());
        b.set_credential(None);
        assert!(!a.has_credential());
    }

    #[test]
    fn empty_body_decodes_as_null() {
        let raw = RawResponse {
            status: StatusCode::NO_CONTENT,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        };
        let value: serde_json::Value = raw.json().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn debug_does_not_leak_credential() {
        let c = client("https://api.example.com");
        c.set_credential(Some(SecretString::from("super-secret".to_string())));
        assert!(!format!("{c:?}").contains("super-secret"));
    }
}
