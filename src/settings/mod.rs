//! Saved settings
//!
//! Presets and logging tokens, each held in a repository backed by the
//! dual-source store.

pub mod preset;
pub mod repository;
pub mod token;

pub use preset::{Preset, PresetRepository};
pub use repository::{Entry, Repository, RepositoryEvent};
pub use token::{LoggingToken, LoggingTokenRepository};

use crate::config::CoreConfig;
use crate::persistence::{DualSourceStore, FileStore, KeyValueStore, MemoryStore};
use crate::utils::error::AppResult;
use std::sync::Arc;

/// Stores and repositories built from a config
///
/// Must be opened inside a Tokio runtime.
pub struct SettingsServices {
    pub store: DualSourceStore,
    pub presets: PresetRepository,
    pub tokens: LoggingTokenRepository,
}

impl SettingsServices {
    /// Build the local store described by `config`, pair it with `remote`
    /// and hydrate both repositories
    pub fn open(config: &CoreConfig, remote: Arc<dyn KeyValueStore>) -> AppResult<Self> {
        let local: Arc<dyn KeyValueStore> = match &config.local_store_path {
            Some(path) => Arc::new(FileStore::open(path)?),
            None => Arc::new(MemoryStore::new()),
        };
        let store = DualSourceStore::new(local, remote);

        let presets = PresetRepository::open(store.clone(), config.presets_key(), config.debounce());
        let tokens = LoggingTokenRepository::open(store.clone(), config.tokens_key(), config.debounce());

        for (key, error) in [
            (presets.key(), presets.load_error()),
            (tokens.key(), tokens.load_error()),
        ] {
            if let Some(e) = error {
                tracing::warn!("Settings '{}' could not be read, keeping changes in memory: {}", key, e);
            }
        }

        Ok(Self {
            store,
            presets,
            tokens,
        })
    }

    /// Write pending changes of both repositories
    pub async fn flush(&self) {
        self.presets.flush().await;
        self.tokens.flush().await;
    }
}
