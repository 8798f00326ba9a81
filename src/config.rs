use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::storage::{Result, StoreError};

/// Store configuration, read from a TOML file.
///
/// ```toml
/// dataDir = "/var/lib/recall"
/// snapshotFile = "store.json"
/// logLevel = "debug"
/// recordEvents = true
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreConfig {
    /// Directory holding the snapshot (defaults to the platform data dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub snapshot_file: String,
    pub log_level: String,
    /// Keep emitted events in the log (observers fire either way)
    pub record_events: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            snapshot_file: "store.json".to_string(),
            log_level: "info".to_string(),
            record_events: true,
        }
    }
}

impl StoreConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| StoreError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| StoreError::Config(e.to_string()))
    }

    /// Default location of the config file
    pub fn default_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|p| p.join("recall").join("config.toml"))
            .ok_or(StoreError::DataDirNotFound)
    }

    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => dirs::data_local_dir()
                .map(|p| p.join("recall"))
                .ok_or(StoreError::DataDirNotFound),
        }
    }

    pub fn snapshot_path(&self) -> Result<PathBuf> {
        Ok(self.data_dir()?.join(&self.snapshot_file))
    }

    pub fn log_filter(&self) -> log::LevelFilter {
        self.log_level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = StoreConfig::load(&temp.path().join("nope.toml")).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = StoreConfig::from_toml_str(
            r#"
            dataDir = "/tmp/recall-test"
            recordEvents = false
            "#,
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/tmp/recall-test")));
        assert!(!config.record_events);
        assert_eq!(config.snapshot_file, "store.json");
        assert_eq!(
            config.snapshot_path().unwrap(),
            PathBuf::from("/tmp/recall-test/store.json")
        );
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = StoreConfig::from_toml_str("recordEvents = maybe").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn test_log_filter() {
        let mut config = StoreConfig::default();
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
        config.log_level = "debug".into();
        assert_eq!(config.log_filter(), log::LevelFilter::Debug);
        config.log_level = "loud".into();
        assert_eq!(config.log_filter(), log::LevelFilter::Info);
    }

    #[test]
    fn test_toml_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let config = StoreConfig {
            log_level: "warn".into(),
            ..StoreConfig::default()
        };
        fs::write(&path, config.to_toml_string().unwrap()).unwrap();
        assert_eq!(StoreConfig::load(&path).unwrap(), config);
    }
}
