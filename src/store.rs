//! Durable key-value storage for cached listings, favorites, ratings, chat and trial state
//!
//! Values are UTF-8 text. Structured values are JSON-encoded via [`get_json`] and
//! [`set_json`]; the trial start is stored as a raw timestamp string.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[cfg(not(target_arch = "wasm32"))]
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

/// Fixed key layout shared with earlier releases of the app.
pub mod keys {
    pub const CACHED_MOVIES: &str = "cachedMovies";
    pub const FAVORITES: &str = "favorites";
    pub const CHAT_LOG: &str = "chatLog";
    pub const TRIAL_START: &str = "trialStart";

    pub fn rating_key(movie_id: u64) -> String {
        format!("rating-{}", movie_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[cfg(not(target_arch = "wasm32"))]
    #[error("failed to write '{key}': {source}")]
    Write {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode value for '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Key-value persistence contract.
///
/// A successful `set` is visible to the next `get` of the same key. A failed
/// `set` leaves the previous value intact.
pub trait Store: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;
}

/// Read and decode a JSON value. Undecodable values are logged and treated as absent.
pub fn get_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Option<T> {
    let raw = store.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(key, error = %err, "discarding undecodable stored value");
            None
        }
    }
}

pub fn set_json<T: Serialize + ?Sized>(store: &dyn Store, key: &str, value: &T) -> StoreResult<()> {
    let encoded = serde_json::to_string(value).map_err(|source| StoreError::Encode {
        key: key.to_string(),
        source,
    })?;
    store.set(key, &encoded)
}

// ============================================
// In-memory backend (wasm, tests)
// ============================================

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().ok()?;
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ============================================
// File backend (native platforms)
// ============================================

/// One file per key under a root directory.
#[cfg(not(target_arch = "wasm32"))]
pub struct FileStore {
    root: PathBuf,
    write_lock: Mutex<()>,
}

#[cfg(not(target_arch = "wasm32"))]
impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store rooted in the platform data directory.
    pub fn open_default() -> Self {
        Self::new(default_store_dir())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn default_store_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        return data_dir.join("movienight").join("store");
    }

    PathBuf::from("cache").join("store")
}

#[cfg(not(target_arch = "wasm32"))]
impl Store for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(err) if err.kind() == io::ErrorKind::NotFound => None,
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read stored value");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let write_err = |source: io::Error| StoreError::Write {
            key: key.to_string(),
            source,
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        fs::create_dir_all(&self.root).map_err(write_err)?;

        // Write beside the target, flush, then swap it in.
        let target = self.path_for(key);
        let staging = target.with_extension("json.tmp");
        if let Err(err) = write_synced(&staging, value) {
            let _ = fs::remove_file(&staging);
            return Err(write_err(err));
        }
        fs::rename(&staging, &target).map_err(write_err)?;
        sync_dir(&self.root).map_err(write_err)?;

        tracing::debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_synced(path: &Path, value: &str) -> io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(value.as_bytes())?;
    file.sync_all()
}

/// Persist the directory entry created by a rename.
#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

#[cfg(all(not(unix), not(target_arch = "wasm32")))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}

/// Platform store: files under `root` (or the data directory) natively, memory on wasm.
#[cfg(not(target_arch = "wasm32"))]
pub fn open_store(root: Option<PathBuf>) -> Arc<dyn Store> {
    let store = match root {
        Some(root) => FileStore::new(root),
        None => FileStore::open_default(),
    };
    tracing::info!(root = %store.root().display(), "opened file store");
    Arc::new(store)
}

#[cfg(target_arch = "wasm32")]
pub fn open_store(_root: Option<std::path::PathBuf>) -> Arc<dyn Store> {
    Arc::new(MemoryStore::new())
}

/// Sanitize storage key for filesystem use
#[cfg(not(target_arch = "wasm32"))]
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .take(64)
        .collect()
}
