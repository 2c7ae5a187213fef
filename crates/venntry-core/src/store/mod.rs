// ── Durable client state ──
//
// Key-value storage backends and the selection store built on them.

mod selection;
mod storage;

pub use selection::{
    AUTH_STORE_KEY, AuthState, INVENTORY_STORE_KEY, InventoryState, LEGACY_INVENTORY_KEY,
    SelectionPhase, SelectionStore, UserProfile,
};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
