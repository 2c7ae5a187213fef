// ── Application context ──
//
// Owns one of each stateful component (API client, selection store,
// session jar, query cache) and hands out services bound to them.
// Cheaply cloneable; there are no globals.

use std::sync::Arc;

use tracing::debug;
use venntry_api::ApiClient;

use crate::cache::QueryCache;
use crate::config::ClientConfig;
use crate::error::CoreError;
use crate::guard::RouteGuard;
use crate::service::{AuthService, InventoryService, ProductService, WarehouseService};
use crate::session::SessionJar;
use crate::store::{KeyValueStore, SelectionStore};

struct ContextInner {
    config: ClientConfig,
    client: ApiClient,
    cache: QueryCache,
    selection: SelectionStore,
    session: SessionJar,
}

#[derive(Clone)]
pub struct AppContext {
    inner: Arc<ContextInner>,
}

impl AppContext {
    /// Build the HTTP client from `config` and load persisted state from
    /// `storage`. Fails on invalid transport settings (for example an
    /// unreadable CA file) before any request is made.
    pub fn new(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self, CoreError> {
        let client = ApiClient::new(config.api_url.clone(), &config.transport())?;
        Ok(Self::with_client(config, client, storage))
    }

    /// Use an existing client. A stored, unexpired session is installed on
    /// it as the bearer credential.
    pub fn with_client(
        config: ClientConfig,
        client: ApiClient,
        storage: Arc<dyn KeyValueStore>,
    ) -> Self {
        let selection = SelectionStore::load(Arc::clone(&storage));
        let session = SessionJar::load(storage);
        if let Some(token) = session.token() {
            debug!("restoring stored session");
            client.set_credential(Some(token));
        }
        let cache = QueryCache::new(Arc::new(client.clone()));

        Self {
            inner: Arc::new(ContextInner {
                config,
                client,
                cache,
                selection,
                session,
            }),
        }
    }

    // ── Components ───────────────────────────────────────────────────

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn cache(&self) -> &QueryCache {
        &self.inner.cache
    }

    pub fn selection(&self) -> &SelectionStore {
        &self.inner.selection
    }

    pub fn session(&self) -> &SessionJar {
        &self.inner.session
    }

    // ── Services ─────────────────────────────────────────────────────

    pub fn auth(&self) -> AuthService {
        AuthService::new(self.clone())
    }

    pub fn inventories(&self) -> InventoryService {
        InventoryService::new(self.clone())
    }

    pub fn products(&self) -> ProductService {
        ProductService::new(self.clone())
    }

    pub fn warehouses(&self) -> WarehouseService {
        WarehouseService::new(self.clone())
    }

    pub fn guard(&self) -> RouteGuard {
        RouteGuard::new(self.clone())
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("api_url", &self.inner.config.api_url.as_str())
            .field("client", &self.inner.client)
            .field("selection", &self.inner.selection)
            .field("session", &self.inner.session)
            .finish_non_exhaustive()
    }
}
