//! Durable key-value storage for the application state blob.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::PersistenceError;
use crate::models::{AppState, compute_stats};

/// Key under which the serialized `AppState` is kept.
pub const STATE_KEY: &str = "interview-coach-app-state";

/// Storage port: raw string values addressed by key.
///
/// A write must be all-or-nothing from the reader's point of view.
pub trait StateStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        let target = self.path_for(key);
        let staging = self.dir.join(format!(".{key}.json.tmp"));

        // Rename is atomic on the same filesystem, so readers never see a torn file.
        let mut file = fs::File::create(&staging)?;
        file.write_all(value.as_bytes())?;
        file.sync_all()?;
        fs::rename(&staging, &target)?;
        Ok(())
    }
}

/// In-process store. Clones share the same backing map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a raw value, e.g. to simulate corrupted storage.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        if let Ok(mut entries) = store.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
        store
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("memory store poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| io::Error::other("memory store poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Loads the state stored under `key`.
///
/// Missing, unreadable and malformed values all yield the default state.
/// Stats are rederived from the loaded history.
pub fn load_state(store: &dyn StateStore, key: &str) -> AppState {
    let raw = match store.read(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!(key, "no stored state, starting fresh");
            return AppState::default();
        }
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to read stored state, using defaults");
            return AppState::default();
        }
    };

    match serde_json::from_str::<AppState>(&raw) {
        Ok(mut state) => {
            state.stats = compute_stats(&state.history);
            tracing::debug!(key, entries = state.history.len(), "loaded stored state");
            state
        }
        Err(err) => {
            let err = PersistenceError::from(err);
            tracing::warn!(key, error = %err, "discarding stored state");
            AppState::default()
        }
    }
}

/// Serializes `state` and writes it under `key`.
pub fn save_state(
    store: &dyn StateStore,
    key: &str,
    state: &AppState,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(state)?;
    store.write(key, &json)
}
