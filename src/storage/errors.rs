use thiserror::Error;

use super::models::{EntityId, EntityKind, Principal};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: EntityId },

    #[error("{caller} is not the owner of {kind} {id}")]
    Unauthorized {
        kind: EntityKind,
        id: EntityId,
        caller: Principal,
    },

    #[error("{0} identifier space exhausted")]
    CapacityExceeded(EntityKind),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    #[error("Store lock poisoned")]
    LockPoisoned,

    #[error("Data directory not found")]
    DataDirNotFound,
}

impl StoreError {
    pub fn not_found(kind: EntityKind, id: EntityId) -> Self {
        Self::NotFound { kind, id }
    }

    /// True for the failures an individual store operation can raise
    pub fn is_operation_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Unauthorized { .. } | Self::CapacityExceeded(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
