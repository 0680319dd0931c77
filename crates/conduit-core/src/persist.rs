//! Persistence bridge between the store and a key-value storage backend.
//!
//! The full state snapshot lives under [`STATE_KEY`]. The raw bearer token is
//! mirrored under [`TOKEN_KEY`] so list fetches can reuse it directly, and the
//! raw user blob written at login lives under [`USER_KEY`].
//!
//! Reads and writes through the bridge are best-effort: failures are logged
//! and swallowed, and an unreadable snapshot falls back to an empty state.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::state::RootState;
use crate::store::Subscriber;

pub const STATE_KEY: &str = "state";
pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

/// String key-value storage in the spirit of browser local storage.
pub trait KeyValueStorage: Clone + Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}

/// File-backed storage keeping one file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the storage directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(Error::Storage(format!("invalid storage key '{key}'")));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(raw) => Ok(Some(raw)),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

/// In-memory storage; clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|error| Error::Storage(error.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Load the persisted snapshot, or `None` when missing or unreadable.
pub fn load_state<S: KeyValueStorage>(storage: &S) -> Option<RootState> {
    let raw = match storage.get(STATE_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(error) => {
            tracing::warn!("Failed to read persisted state: {}", error);
            return None;
        }
    };

    match serde_json::from_str::<RootState>(&raw) {
        Ok(state) => Some(state.rehydrated()),
        Err(error) => {
            tracing::warn!("Ignoring unreadable persisted state: {}", error);
            None
        }
    }
}

/// Write the snapshot; failures are logged and swallowed.
pub fn save_state<S: KeyValueStorage>(storage: &S, state: &RootState) {
    if let Err(error) = write_state(storage, state) {
        tracing::warn!("Failed to persist state: {}", error);
    }
}

fn write_state<S: KeyValueStorage>(storage: &S, state: &RootState) -> Result<()> {
    let raw = serde_json::to_string(state)?;
    storage.set(STATE_KEY, &raw)
}

/// Raw bearer token mirrored by the bridge.
pub fn load_token<S: KeyValueStorage>(storage: &S) -> Option<String> {
    match storage.get(TOKEN_KEY) {
        Ok(token) => crate::util::normalize_text_option(token),
        Err(error) => {
            tracing::warn!("Failed to read persisted token: {}", error);
            None
        }
    }
}

/// Subscriber mirroring every state change into storage.
#[derive(Debug, Clone)]
pub struct PersistenceBridge<S: KeyValueStorage> {
    storage: S,
}

impl<S: KeyValueStorage> PersistenceBridge<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }
}

impl<S: KeyValueStorage> Subscriber for PersistenceBridge<S> {
    fn on_change(&mut self, state: &RootState) {
        save_state(&self.storage, state);

        let result = match state.token() {
            Some(token) => self.storage.set(TOKEN_KEY, token),
            None => self.storage.remove(TOKEN_KEY),
        };
        if let Err(error) = result {
            tracing::warn!("Failed to persist token: {}", error);
        }
    }
}
