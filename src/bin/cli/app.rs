use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use recall_lib::snapshot;
use recall_lib::{KnowledgeStore, Principal, StoreConfig};

/// Load the config from `path`, or from the default location
pub fn load_config(path: Option<&Path>) -> Result<StoreConfig> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => StoreConfig::default_path().context("Failed to locate config directory")?,
    };
    StoreConfig::load(&path).with_context(|| format!("Failed to read config {}", path.display()))
}

/// Shared state for CLI commands: one store loaded from one snapshot file
pub struct App {
    pub config: StoreConfig,
    pub snapshot_path: PathBuf,
    pub store: KnowledgeStore,
    pub principal: Principal,
}

impl App {
    pub fn open(config: StoreConfig, snapshot: Option<PathBuf>, principal: String) -> Result<Self> {
        let snapshot_path = match snapshot {
            Some(p) => p,
            None => config
                .snapshot_path()
                .context("Failed to get data directory")?,
        };

        let mut store = snapshot::load(&snapshot_path)
            .with_context(|| format!("Failed to load snapshot {}", snapshot_path.display()))?;
        store.apply_config(&config);

        Ok(Self {
            config,
            snapshot_path,
            store,
            principal: Principal::new(principal),
        })
    }

    /// Persist the store after a mutation
    pub fn save(&self) -> Result<()> {
        snapshot::save(&self.snapshot_path, &self.store)
            .with_context(|| format!("Failed to save snapshot {}", self.snapshot_path.display()))?;
        Ok(())
    }
}
