//! Client-side data layer between `venntry-api` and a UI.
//!
//! - **[`AppContext`]**: owns the API client, the persisted selection, the
//!   session credential and the query cache, and vends services bound to
//!   them. Cheap to clone; no global state.
//!
//! - **[`SelectionStore`]**: signed-in user profile and the selected
//!   inventory, persisted through a [`KeyValueStore`] (write to storage,
//!   then publish on a `watch` channel).
//!
//! - **[`QueryCache`]**: resource-path keyed cache with one in-flight fetch
//!   per key, synchronous `mutate`, and [`QueryWatch`] subscriptions.
//!
//! - **[`actions`]**: typed mutations returning [`ActionResult`]. Failures
//!   are normalized into [`ActionError`]; nothing panics or escapes raw.
//!
//! - **Services** ([`ProductService`], [`WarehouseService`],
//!   [`InventoryService`], [`AuthService`]): reads scoped to the current
//!   selection, writes that patch the cache after a successful action.
//!
//! - **[`RouteGuard`]** and **[`SessionJar`]**: the session cookie and the
//!   check that gates protected routes.

pub mod actions;
pub mod cache;
pub mod config;
pub mod context;
pub mod error;
pub mod guard;
pub mod service;
pub mod session;
pub mod store;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use actions::{ActionError, ActionErrorKind, ActionResult, AuthenticatedUser};
pub use cache::{Fetcher, Query, QueryCache, QueryWatch, ResourceKey};
pub use config::{ClientConfig, Environment};
pub use context::AppContext;
pub use error::CoreError;
pub use guard::{LOGIN_PATH, PUBLIC_PATHS, RouteDecision, RouteGuard};
pub use service::{AuthService, InventoryService, ProductService, WarehouseService};
pub use session::{SessionCookie, SessionJar};
pub use store::{
    FileStore, KeyValueStore, MemoryStore, SelectionPhase, SelectionStore, StorageError,
    UserProfile,
};
pub use validate::{Validate, ValidationErrors};

/// The wire types are part of this crate's API.
pub use venntry_api as api;
