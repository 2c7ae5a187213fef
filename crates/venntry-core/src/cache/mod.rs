// ── Resource query cache ──
//
// Keyed by resource path. Serves cached data when present and fetches
// otherwise, with at most one in-flight fetch per key. `mutate` overwrites
// an entry synchronously; every overwrite bumps the entry's epoch, and a
// fetch only lands if the epoch it started under is still current.

mod fetcher;
mod key;
mod query;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, trace, warn};

pub use fetcher::Fetcher;
pub use key::ResourceKey;
pub use query::{Query, QueryState, QueryStream, QueryWatch};

use crate::error::CoreError;

type FetchOutcome = Result<Arc<Value>, Arc<CoreError>>;
type SharedFetch = Shared<BoxFuture<'static, FetchOutcome>>;

struct InFlight {
    epoch: u64,
    fetch: SharedFetch,
}

struct CacheEntry {
    state: watch::Sender<QueryState>,
    /// Bumped (under the `state` lock) by every overwrite.
    epoch: AtomicU64,
    in_flight: Mutex<Option<InFlight>>,
}

impl CacheEntry {
    fn new() -> Self {
        Self {
            state: watch::Sender::new(QueryState::default()),
            epoch: AtomicU64::new(0),
            in_flight: Mutex::new(None),
        }
    }

    /// Overwrite data, clear the error, and invalidate any fetch in flight.
    fn overwrite(&self, data: Option<Arc<Value>>) {
        self.state.send_modify(|s| {
            self.epoch.fetch_add(1, Ordering::SeqCst);
            s.data = data;
            s.error = None;
        });
    }

    /// Record a finished fetch. Results from a fetch that started before
    /// the latest overwrite are dropped.
    fn settle(&self, key: &ResourceKey, epoch: u64, outcome: &FetchOutcome) {
        let still_validating = {
            let mut slot = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
            if slot.as_ref().is_some_and(|f| f.epoch == epoch) {
                *slot = None;
            }
            slot.is_some()
        };

        self.state.send_modify(|s| {
            s.is_validating = still_validating;
            if self.epoch.load(Ordering::SeqCst) != epoch {
                debug!(%key, "discarding fetch superseded by a local write");
                return;
            }
            match outcome {
                Ok(data) => {
                    s.data = Some(Arc::clone(data));
                    s.error = None;
                }
                Err(err) => s.error = Some(Arc::clone(err)),
            }
        });
    }
}

struct CacheInner {
    fetcher: Arc<dyn Fetcher>,
    entries: DashMap<ResourceKey, Arc<CacheEntry>>,
}

/// In-memory cache of remote resources. Cheap to clone.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<CacheInner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.inner.entries.len())
            .finish_non_exhaustive()
    }
}

impl QueryCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                fetcher,
                entries: DashMap::new(),
            }),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    /// Read `key`, fetching it first if nothing is cached.
    ///
    /// A `None` key is a query that cannot run yet (for instance, no
    /// inventory selected): it never fetches and reads as loading.
    pub async fn query<T: DeserializeOwned>(&self, key: Option<&ResourceKey>) -> Query<T> {
        let Some(key) = key else {
            return Query::idle();
        };
        let entry = self.entry(key);

        if entry.state.borrow().data.is_none() {
            // Errors are recorded in the entry; the read below reports them.
            let _ = self.start_fetch(key, &entry).await;
        }
        Query::from_state(&entry.state.borrow())
    }

    /// Cached value only; never fetches.
    pub fn peek<T: DeserializeOwned>(&self, key: &ResourceKey) -> Query<T> {
        match self.inner.entries.get(key) {
            Some(entry) => Query::from_state(&entry.state.borrow()),
            None => Query::from_state(&QueryState::default()),
        }
    }

    /// Fetch `key` again, sharing any fetch already running for it.
    pub async fn revalidate(&self, key: &ResourceKey) -> Result<(), Arc<CoreError>> {
        let entry = self.entry(key);
        self.start_fetch(key, &entry).await.map(|_| ())
    }

    pub fn subscribe<T: DeserializeOwned>(&self, key: &ResourceKey) -> QueryWatch<T> {
        QueryWatch::new(self.entry(key).state.subscribe())
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Overwrite the cached value for `key`. Visible to the next read.
    ///
    /// With `revalidate`, a background refetch is scheduled to reconcile
    /// with the server.
    pub fn mutate<T: Serialize>(
        &self,
        key: &ResourceKey,
        data: &T,
        revalidate: bool,
    ) -> Result<(), CoreError> {
        let value = serde_json::to_value(data).map_err(|e| CoreError::Internal(e.to_string()))?;
        let entry = self.entry(key);
        entry.overwrite(Some(Arc::new(value)));
        trace!(%key, "cache entry overwritten");

        if revalidate {
            self.spawn_revalidate(key, &entry);
        }
        Ok(())
    }

    /// Functional update of the cached value.
    ///
    /// `f` receives the current value (or `None` when nothing is cached)
    /// and returns the replacement; returning `None` leaves the data
    /// untouched. Either way a fetch already in flight for `key` no longer
    /// lands, since it was issued before this write. `f` runs while the
    /// entry is locked and must not call back into the cache.
    pub fn mutate_with<T, F>(
        &self,
        key: &ResourceKey,
        f: F,
        revalidate: bool,
    ) -> Result<(), CoreError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(Option<T>) -> Option<T>,
    {
        let entry = self.entry(key);
        let mut result = Ok(());

        entry.state.send_if_modified(|s| {
            let current = match s.data.as_deref().map(T::deserialize).transpose() {
                Ok(current) => current,
                Err(e) => {
                    result = Err(CoreError::Decode {
                        message: e.to_string(),
                    });
                    return false;
                }
            };
            let Some(next) = f(current) else {
                entry.epoch.fetch_add(1, Ordering::SeqCst);
                return false;
            };
            match serde_json::to_value(&next) {
                Ok(value) => {
                    entry.epoch.fetch_add(1, Ordering::SeqCst);
                    s.data = Some(Arc::new(value));
                    s.error = None;
                    true
                }
                Err(e) => {
                    result = Err(CoreError::Internal(e.to_string()));
                    false
                }
            }
        });

        if result.is_ok() && revalidate {
            self.spawn_revalidate(key, &entry);
        }
        result
    }

    /// Forget the cached value; the next `query` fetches again.
    pub fn invalidate(&self, key: &ResourceKey) {
        if let Some(entry) = self.inner.entries.get(key) {
            entry.overwrite(None);
        }
    }

    /// Forget everything (used on logout).
    pub fn clear(&self) {
        for entry in &self.inner.entries {
            entry.overwrite(None);
        }
        debug!("query cache cleared");
    }

    // ── Internals ────────────────────────────────────────────────────

    fn entry(&self, key: &ResourceKey) -> Arc<CacheEntry> {
        Arc::clone(
            &self
                .inner
                .entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(CacheEntry::new())),
        )
    }

    /// Join the fetch in flight for the current epoch, or start one.
    fn start_fetch(&self, key: &ResourceKey, entry: &Arc<CacheEntry>) -> SharedFetch {
        let mut slot = entry.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let epoch = entry.epoch.load(Ordering::SeqCst);

        if let Some(in_flight) = slot.as_ref().filter(|f| f.epoch == epoch) {
            trace!(%key, "joining in-flight fetch");
            return in_flight.fetch.clone();
        }

        debug!(%key, "fetching");
        entry.state.send_modify(|s| s.is_validating = true);

        let fetch = self.inner.fetcher.fetch(key);
        let owner = Arc::clone(entry);
        let key = key.clone();
        let shared = async move {
            let outcome = fetch.await.map(Arc::new).map_err(Arc::new);
            owner.settle(&key, epoch, &outcome);
            outcome
        }
        .boxed()
        .shared();

        *slot = Some(InFlight {
            epoch,
            fetch: shared.clone(),
        });
        shared
    }

    fn spawn_revalidate(&self, key: &ResourceKey, entry: &Arc<CacheEntry>) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let fetch = self.start_fetch(key, entry);
                handle.spawn(async move {
                    let _ = fetch.await;
                });
            }
            Err(_) => warn!(%key, "no async runtime; skipping background revalidation"),
        }
    }
}
