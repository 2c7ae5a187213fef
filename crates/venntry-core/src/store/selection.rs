// ── Persisted selection store ──
//
// Holds the signed-in user's profile and the currently selected inventory.
// Both survive restarts through a `KeyValueStore`. Every write reaches
// durable storage before the in-memory value is published, so a failed
// write leaves memory untouched and the two never disagree.

use std::sync::{Arc, Mutex, PoisonError};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;
use venntry_api::{Inventory, LoginResponse};

use super::storage::{KeyValueStore, StorageError};

/// Storage key of the user blob.
pub const AUTH_STORE_KEY: &str = "auth-store";
/// Storage key of the selection blob.
pub const INVENTORY_STORE_KEY: &str = "inventory-store";
/// Key used by the previous storage format for the selection.
pub const LEGACY_INVENTORY_KEY: &str = "inventory";

/// The authenticated user, as kept on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub inventories: Vec<Inventory>,
}

impl From<&LoginResponse> for UserProfile {
    fn from(resp: &LoginResponse) -> Self {
        Self {
            id: resp.user_id,
            username: resp.user_name.clone(),
            email: resp.email.clone(),
            avatar: resp.avatar.clone(),
            inventories: resp.inventories.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub is_authenticated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryState {
    #[serde(default)]
    pub current_inventory: Option<Inventory>,
}

/// Where the store sits in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Anonymous,
    NoInventory,
    InventorySelected,
}

/// On-disk envelope: `{"state": {...}, "version": 0}`.
#[derive(Serialize, Deserialize)]
struct Persisted<T> {
    state: T,
    #[serde(default)]
    version: u32,
}

const STORE_VERSION: u32 = 0;

pub struct SelectionStore {
    storage: Arc<dyn KeyValueStore>,
    auth: watch::Sender<Arc<AuthState>>,
    inventory: watch::Sender<Arc<InventoryState>>,
    /// Serializes persist-then-publish so concurrent writers cannot
    /// interleave storage and memory updates.
    write_lock: Mutex<()>,
}

impl SelectionStore {
    /// Rehydrate from storage. Missing or unreadable blobs start empty.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let auth: AuthState = read_blob(storage.as_ref(), AUTH_STORE_KEY).unwrap_or_default();
        let inventory = read_blob::<InventoryState>(storage.as_ref(), INVENTORY_STORE_KEY)
            .or_else(|| read_legacy_inventory(storage.as_ref()))
            .unwrap_or_default();

        debug!(
            authenticated = auth.is_authenticated,
            inventory = ?inventory.current_inventory.as_ref().map(|i| i.id),
            "selection store loaded"
        );

        Self {
            storage,
            auth: watch::Sender::new(Arc::new(auth)),
            inventory: watch::Sender::new(Arc::new(inventory)),
            write_lock: Mutex::new(()),
        }
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn auth_state(&self) -> Arc<AuthState> {
        self.auth.borrow().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.auth.borrow().user.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.borrow().is_authenticated
    }

    pub fn current_inventory(&self) -> Option<Inventory> {
        self.inventory.borrow().current_inventory.clone()
    }

    pub fn current_inventory_id(&self) -> Option<Uuid> {
        self.inventory.borrow().current_inventory.as_ref().map(|i| i.id)
    }

    pub fn phase(&self) -> SelectionPhase {
        if !self.is_authenticated() {
            SelectionPhase::Anonymous
        } else if self.current_inventory_id().is_some() {
            SelectionPhase::InventorySelected
        } else {
            SelectionPhase::NoInventory
        }
    }

    // ── Writes ───────────────────────────────────────────────────────

    /// Replace the stored profile and mark the session authenticated.
    pub fn set_user(&self, profile: UserProfile) -> Result<(), StorageError> {
        self.write_auth(AuthState {
            user: Some(profile),
            is_authenticated: true,
        })
    }

    /// Forget the user. The inventory selection is left alone.
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        self.write_auth(AuthState::default())
    }

    pub fn set_current_inventory(&self, inventory: Inventory) -> Result<(), StorageError> {
        self.write_inventory(
            InventoryState {
                current_inventory: Some(inventory),
            },
            false,
        )
    }

    /// Drop the selection, including any blob left under the legacy key.
    pub fn delete_inventory(&self) -> Result<(), StorageError> {
        self.write_inventory(InventoryState::default(), true)
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe_auth(&self) -> watch::Receiver<Arc<AuthState>> {
        self.auth.subscribe()
    }

    pub fn subscribe_inventory(&self) -> watch::Receiver<Arc<InventoryState>> {
        self.inventory.subscribe()
    }

    // ── Internals ────────────────────────────────────────────────────

    fn write_auth(&self, state: AuthState) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        write_blob(self.storage.as_ref(), AUTH_STORE_KEY, &state)?;
        self.auth.send_replace(Arc::new(state));
        Ok(())
    }

    fn write_inventory(
        &self,
        state: InventoryState,
        drop_legacy: bool,
    ) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        if drop_legacy {
            self.storage.remove(LEGACY_INVENTORY_KEY)?;
        }
        write_blob(self.storage.as_ref(), INVENTORY_STORE_KEY, &state)?;
        self.inventory.send_replace(Arc::new(state));
        Ok(())
    }
}

impl std::fmt::Debug for SelectionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionStore")
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

fn read_blob<T: DeserializeOwned>(storage: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match storage.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            warn!(key, error = %e, "failed to read stored state; starting empty");
            return None;
        }
    };
    match serde_json::from_str::<Persisted<T>>(&raw) {
        Ok(blob) => Some(blob.state),
        Err(e) => {
            warn!(key, error = %e, "ignoring corrupt stored state");
            None
        }
    }
}

/// The previous format stored `{"state": {"currentInventory": ...}}` under
/// `inventory`. Only consulted when the current key is absent.
fn read_legacy_inventory(storage: &dyn KeyValueStore) -> Option<InventoryState> {
    let state = read_blob::<InventoryState>(storage, LEGACY_INVENTORY_KEY)?;
    debug!("selection restored from legacy key");
    Some(state)
}

fn write_blob<T: Serialize>(
    storage: &dyn KeyValueStore,
    key: &str,
    state: &T,
) -> Result<(), StorageError> {
    let blob = serde_json::to_string(&Persisted {
        state,
        version: STORE_VERSION,
    })?;
    storage.set(key, &blob)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::store::MemoryStore;

    fn inventory(name: &str) -> Inventory {
        Inventory {
            id: Uuid::new_v4(),
            name: name.into(),
            user_id: Uuid::new_v4(),
            created_at: None,
            updated_at: None,
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            id: Uuid::new_v4(),
            username: "ada".into(),
            email: "ada@example.com".into(),
            avatar: None,
            inventories: vec![inventory("Main")],
        }
    }

    fn store() -> (Arc<MemoryStore>, SelectionStore) {
        let backend = Arc::new(MemoryStore::new());
        let store = SelectionStore::load(backend.clone());
        (backend, store)
    }

    #[test]
    fn walks_the_phase_machine() {
        let (_, store) = store();
        assert_eq!(store.phase(), SelectionPhase::Anonymous);

        store.set_user(profile()).unwrap();
        assert_eq!(store.phase(), SelectionPhase::NoInventory);

        store.set_current_inventory(inventory("Main")).unwrap();
        assert_eq!(store.phase(), SelectionPhase::InventorySelected);

        store.delete_inventory().unwrap();
        assert_eq!(store.phase(), SelectionPhase::NoInventory);

        store.set_current_inventory(inventory("Other")).unwrap();
        store.clear_auth().unwrap();
        assert_eq!(store.phase(), SelectionPhase::Anonymous);
        assert!(store.user().is_none());
    }

    #[test]
    fn survives_reload() {
        let (backend, store) = store();
        let user = profile();
        let inv = inventory("Main");
        store.set_user(user.clone()).unwrap();
        store.set_current_inventory(inv.clone()).unwrap();

        let reloaded = SelectionStore::load(backend);
        assert_eq!(reloaded.user(), Some(user));
        assert_eq!(reloaded.current_inventory(), Some(inv));
        assert!(reloaded.is_authenticated());
    }

    #[test]
    fn blobs_use_state_envelope() {
        let (backend, store) = store();
        store.set_current_inventory(inventory("Main")).unwrap();

        let raw = backend.get(INVENTORY_STORE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["version"], 0);
        assert_eq!(value["state"]["currentInventory"]["name"], "Main");
    }

    #[test]
    fn failed_write_leaves_memory_unchanged() {
        let (backend, store) = store();
        let inv = inventory("Main");
        store.set_current_inventory(inv.clone()).unwrap();

        backend.set_read_only(true);
        assert!(store.set_current_inventory(inventory("Other")).is_err());
        assert!(store.delete_inventory().is_err());
        assert!(store.set_user(profile()).is_err());

        assert_eq!(store.current_inventory(), Some(inv));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn delete_inventory_removes_legacy_key() {
        let (backend, store) = store();
        backend
            .set(LEGACY_INVENTORY_KEY, r#"{"state":{"currentInventory":null},"version":0}"#)
            .unwrap();

        store.delete_inventory().unwrap();
        assert_eq!(backend.get(LEGACY_INVENTORY_KEY).unwrap(), None);
    }

    #[test]
    fn legacy_selection_is_read_when_current_key_missing() {
        let backend = Arc::new(MemoryStore::new());
        let inv = inventory("Old");
        let blob = serde_json::json!({
            "state": { "currentInventory": inv },
            "version": 0
        });
        backend
            .set(LEGACY_INVENTORY_KEY, &blob.to_string())
            .unwrap();

        let store = SelectionStore::load(backend);
        assert_eq!(store.current_inventory(), Some(inv));
    }

    #[test]
    fn corrupt_blob_is_ignored() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(AUTH_STORE_KEY, "{not json").unwrap();
        let store = SelectionStore::load(backend);
        assert_eq!(store.phase(), SelectionPhase::Anonymous);
    }

    #[test]
    fn subscribers_see_published_state() {
        let (_, store) = store();
        let mut rx = store.subscribe_inventory();
        let inv = inventory("Main");
        store.set_current_inventory(inv.clone()).unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().current_inventory.as_ref(),
            Some(&inv)
        );
    }
}
