// ── Query snapshots and subscriptions ──

use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_core::Stream;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::error::CoreError;

/// Raw per-key state held by the cache.
#[derive(Debug, Clone, Default)]
pub struct QueryState {
    pub data: Option<Arc<Value>>,
    pub error: Option<Arc<CoreError>>,
    pub is_validating: bool,
}

/// A typed read of one cache entry.
///
/// `is_loading` is true exactly when neither data nor an error is present.
/// An empty list is data, so it is not loading.
#[derive(Debug, Clone)]
pub struct Query<T> {
    pub data: Option<T>,
    pub error: Option<Arc<CoreError>>,
    pub is_loading: bool,
    pub is_validating: bool,
}

impl<T> Query<T> {
    /// The read for a query without a key: nothing to fetch yet.
    pub fn idle() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: true,
            is_validating: false,
        }
    }

    fn new(data: Option<T>, error: Option<Arc<CoreError>>, is_validating: bool) -> Self {
        let is_loading = data.is_none() && error.is_none();
        Self {
            data,
            error,
            is_loading,
            is_validating,
        }
    }

    /// Collapse into a `Result`, treating "still loading" as no data.
    pub fn into_result(self) -> Result<Option<T>, Arc<CoreError>> {
        match (self.data, self.error) {
            (Some(data), _) => Ok(Some(data)),
            (None, Some(err)) => Err(err),
            (None, None) => Ok(None),
        }
    }
}

impl<T: DeserializeOwned> Query<T> {
    /// Decode a raw state. A value that does not fit `T` is reported as
    /// the query's error.
    pub(crate) fn from_state(state: &QueryState) -> Self {
        match state.data.as_deref().map(T::deserialize) {
            Some(Ok(data)) => Self::new(Some(data), state.error.clone(), state.is_validating),
            Some(Err(e)) => Self::new(
                None,
                Some(Arc::new(CoreError::Decode {
                    message: e.to_string(),
                })),
                state.is_validating,
            ),
            None => Self::new(None, state.error.clone(), state.is_validating),
        }
    }
}

// ── Subscriptions ────────────────────────────────────────────────────

/// Live view of one cache entry.
pub struct QueryWatch<T> {
    receiver: watch::Receiver<QueryState>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> QueryWatch<T> {
    pub(crate) fn new(receiver: watch::Receiver<QueryState>) -> Self {
        Self {
            receiver,
            _marker: PhantomData,
        }
    }

    /// The entry as it is right now.
    pub fn current(&self) -> Query<T> {
        Query::from_state(&self.receiver.borrow())
    }

    /// Wait for the next change. `None` once the cache is gone.
    pub async fn changed(&mut self) -> Option<Query<T>> {
        self.receiver.changed().await.ok()?;
        Some(Query::from_state(&self.receiver.borrow_and_update()))
    }

    pub fn into_stream(self) -> QueryStream<T> {
        QueryStream {
            inner: WatchStream::new(self.receiver),
            _marker: PhantomData,
        }
    }
}

/// `Stream` adapter yielding a decoded [`Query`] on every change,
/// starting with the current value.
pub struct QueryStream<T> {
    inner: WatchStream<QueryState>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: DeserializeOwned> Stream for QueryStream<T> {
    type Item = Query<T>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner)
            .poll_next(cx)
            .map(|state| state.map(|s| Query::from_state(&s)))
    }
}
