//! Key-value stores
//!
//! Settings live in two stores: a local one on the device and a remote one
//! that syncs between installs. `DualSourceStore` reads remote first and
//! falls back to local, and writes through to both.

use super::container::{CodecError, Persisted, StoredEntry, VersionedContainer};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Errors loading or saving a persisted value
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A synchronous key-value store of versioned containers
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<StoredEntry>;

    fn set(&self, key: &str, entry: StoredEntry) -> Result<(), StoreError>;

    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoredEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<StoredEntry> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, entry: StoredEntry) -> Result<(), StoreError> {
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.write().remove(key);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON-file backed store
///
/// Reads are served from memory. Every write rewrites the whole file
/// through a temporary file in the same directory and an atomic rename.
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, StoredEntry>>,
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = if path.exists() {
            let content = fs::read(&path)?;
            if content.is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_slice(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!("Opened settings store {:?} with {} key(s)", path, entries.len());

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, StoredEntry>) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let content = serde_json::to_vec(entries)?;
        let mut file = tempfile::NamedTempFile::new_in(&dir)?;
        file.write_all(&content)?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<StoredEntry> {
        self.entries.read().get(key).cloned()
    }

    fn set(&self, key: &str, entry: StoredEntry) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), entry);
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

// =============================================================================
// Dual-Source Store
// =============================================================================

/// Local and remote stores with remote-first reads and write-through
#[derive(Clone)]
pub struct DualSourceStore {
    local: Arc<dyn KeyValueStore>,
    remote: Arc<dyn KeyValueStore>,
}

impl DualSourceStore {
    pub fn new(local: Arc<dyn KeyValueStore>, remote: Arc<dyn KeyValueStore>) -> Self {
        Self { local, remote }
    }

    /// Remote value if present, otherwise local
    pub fn get(&self, key: &str) -> Option<StoredEntry> {
        self.remote.get(key).or_else(|| self.local.get(key))
    }

    /// Write to both stores.
    ///
    /// Both writes are always attempted; the first failure is returned.
    pub fn set(&self, key: &str, entry: StoredEntry) -> Result<(), StoreError> {
        let local = self.local.set(key, entry.clone());
        let remote = self.remote.set(key, entry);
        if let Err(e) = &remote {
            tracing::warn!("Remote settings write for '{}' failed: {}", key, e);
        }
        local.and(remote)
    }

    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        let local = self.local.remove(key);
        let remote = self.remote.remove(key);
        local.and(remote)
    }

    /// Read and decode a value. An absent key is the type's default.
    pub fn load<T: Persisted>(&self, key: &str) -> Result<T, CodecError> {
        let container: VersionedContainer<T> = match self.get(key) {
            Some(entry) => entry.into(),
            None => VersionedContainer::empty(),
        };
        T::codec().decode(&container)
    }

    /// Encode and write a value to both stores
    pub fn save<T: Persisted>(&self, key: &str, value: &T) -> Result<(), SettingsError> {
        let container = T::codec().encode(value)?;
        self.set(key, container.into_entry())?;
        Ok(())
    }
}
