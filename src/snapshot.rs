//! Whole-store JSON snapshots.
//!
//! A snapshot file holds the serialized store plus a metadata block:
//! - Timestamp of the save
//! - SHA-256 hash of the state (corruption detection)
//! - Entity and event counts, for listing without parsing the state
//!
//! Loading recomputes the hash and cross-checks every index before handing the
//! store back.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::store::KnowledgeStore;
use crate::storage::{Result, StoreError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMeta {
    pub ts: DateTime<Utc>,
    pub content_hash: String,
    pub record_count: usize,
    pub flashcard_count: usize,
    pub event_count: usize,
}

#[derive(Serialize, Deserialize)]
struct SnapshotFile {
    meta: SnapshotMeta,
    state: Value,
}

/// SHA-256 of the canonical JSON form of `state`
pub fn content_hash(state: &Value) -> String {
    let json = serde_json::to_string(state).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("sha256:{:x}", hasher.finalize())
}

/// Write `store` to `path`, replacing any previous snapshot.
pub fn save(path: &Path, store: &KnowledgeStore) -> Result<SnapshotMeta> {
    let state = serde_json::to_value(store)?;
    let meta = SnapshotMeta {
        ts: Utc::now(),
        content_hash: content_hash(&state),
        record_count: store.record_count(),
        flashcard_count: store.flashcard_count(),
        event_count: store.events().len(),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let file = SnapshotFile {
        meta: meta.clone(),
        state,
    };
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(&file)?)?;
    fs::rename(&tmp, path)?;

    log::info!(
        "Saved snapshot {} ({} records, {} flashcards)",
        path.display(),
        meta.record_count,
        meta.flashcard_count
    );
    Ok(meta)
}

/// Load a store from `path`. A missing file yields an empty store.
pub fn load(path: &Path) -> Result<KnowledgeStore> {
    if !path.exists() {
        log::info!("No snapshot at {}, starting empty", path.display());
        return Ok(KnowledgeStore::new());
    }

    let content = fs::read_to_string(path)?;
    let file: SnapshotFile = serde_json::from_str(&content)?;

    let actual = content_hash(&file.state);
    if actual != file.meta.content_hash {
        return Err(StoreError::CorruptSnapshot(format!(
            "content hash {} does not match recorded {}",
            actual, file.meta.content_hash
        )));
    }

    let store: KnowledgeStore = serde_json::from_value(file.state)
        .map_err(|e| StoreError::CorruptSnapshot(e.to_string()))?;
    store.verify().map_err(StoreError::CorruptSnapshot)?;

    log::info!(
        "Loaded snapshot {} ({} records, {} flashcards)",
        path.display(),
        store.record_count(),
        store.flashcard_count()
    );
    Ok(store)
}

/// Read only the metadata block of a snapshot
pub fn read_meta(path: &Path) -> Result<SnapshotMeta> {
    let content = fs::read_to_string(path)?;
    let file: SnapshotFile = serde_json::from_str(&content)?;
    Ok(file.meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Principal;
    use tempfile::TempDir;

    fn sample_store() -> KnowledgeStore {
        let alice = Principal::from("alice");
        let bob = Principal::from("bob");
        let mut store = KnowledgeStore::new();
        let r1 = store.add_record(&alice, "Traits", "Shared behaviour").unwrap();
        let r2 = store.add_record(&alice, "Lifetimes", "").unwrap();
        store.add_flashcard(&alice, r1, "dyn vs impl?", "dispatch").unwrap();
        store.add_flashcard(&bob, r1, "orphan rule?", "coherence").unwrap();
        store.add_flashcard(&alice, r2, "'a?", "a lifetime").unwrap();
        store.remove_record(&alice, r1).unwrap();
        store
    }

    #[test]
    fn test_missing_snapshot_loads_empty() {
        let temp = TempDir::new().unwrap();
        let store = load(&temp.path().join("store.json")).unwrap();
        assert_eq!(store.record_count(), 0);
    }

    #[test]
    fn test_save_and_load_preserves_state() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("store.json");
        let store = sample_store();

        let meta = save(&path, &store).unwrap();
        assert_eq!(meta.record_count, 1);
        assert_eq!(meta.flashcard_count, 2);
        assert!(meta.content_hash.starts_with("sha256:"));
        assert_eq!(read_meta(&path).unwrap(), meta);

        let mut loaded = load(&path).unwrap();
        assert_eq!(loaded.get_all_records(), store.get_all_records());
        assert_eq!(loaded.events().events(), store.events().events());
        assert!(loaded.has_flashcards_under(1, &Principal::from("bob")));

        // counters survive, so ids are not reissued
        let next = loaded.add_record(&Principal::from("alice"), "new", "").unwrap();
        assert_eq!(next, 3);
    }

    #[test]
    fn test_tampered_snapshot_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");
        save(&path, &sample_store()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        fs::write(&path, content.replace("Lifetimes", "Lifetymes")).unwrap();

        assert!(matches!(load(&path), Err(StoreError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_inconsistent_state_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("store.json");

        let mut state = serde_json::to_value(sample_store()).unwrap();
        // claim fewer issued record ids than are stored
        state["ids"]["lastRecordId"] = Value::from(0);
        let file = SnapshotFile {
            meta: SnapshotMeta {
                ts: Utc::now(),
                content_hash: content_hash(&state),
                record_count: 1,
                flashcard_count: 2,
                event_count: 0,
            },
            state,
        };
        fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let err = load(&path).unwrap_err();
        assert!(matches!(err, StoreError::CorruptSnapshot(msg) if msg.contains("last issued")));
    }
}
