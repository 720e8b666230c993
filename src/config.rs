//! Core configuration
//!
//! Read from a JSON file by the host. Every field has a default so a
//! partial (or missing) file is valid.

use crate::utils::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for the settings and export services
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CoreConfig {
    /// Namespace for persisted keys
    pub app_id: String,
    /// Quiet period before a repository change is written
    pub persistence_debounce_ms: u64,
    /// JSON file backing the local store; in-memory when absent
    pub local_store_path: Option<PathBuf>,
    /// Root for temporary export artifacts; system temp when absent
    pub export_temp_dir: Option<PathBuf>,
    /// Finished export artifacts kept for re-export before the oldest is
    /// removed
    pub export_retained_artifacts: usize,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            app_id: "com.mbientlab.metabase".to_string(),
            persistence_debounce_ms: 250,
            local_store_path: None,
            export_temp_dir: None,
            export_retained_artifacts: 8,
        }
    }
}

impl CoreConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("{}: {}", path.display(), e)))?;

        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.persistence_debounce_ms)
    }

    pub fn presets_key(&self) -> String {
        format!("{}.sensorPresets", self.app_id)
    }

    pub fn tokens_key(&self) -> String {
        format!("{}.loggingTokens", self.app_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = CoreConfig::load(dir.path().join("absent.json")).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert_eq!(config.presets_key(), "com.mbientlab.metabase.sensorPresets");
        assert_eq!(config.tokens_key(), "com.mbientlab.metabase.loggingTokens");
    }

    #[test]
    fn test_partial_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"appId": "org.example", "persistenceDebounceMs": 10}"#).unwrap();

        let config = CoreConfig::load(&path).unwrap();
        assert_eq!(config.app_id, "org.example");
        assert_eq!(config.debounce(), Duration::from_millis(10));
        assert!(config.local_store_path.is_none());
        assert_eq!(config.export_retained_artifacts, 8);
        assert_eq!(config.presets_key(), "org.example.sensorPresets");
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(CoreConfig::load(&path), Err(AppError::Config(_))));
    }
}
