use serde::{Deserialize, Serialize};

use super::models::Record;
use crate::storage::{EntityStore, Principal, RecordId, Result, Timestamp};

/// Storage for records: the dense record arena plus the owner index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordStore {
    inner: EntityStore<Record>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: Record) {
        log::debug!("Storing record {} for {}", record.record_id, record.owner);
        self.inner.insert(record);
    }

    pub fn get(&self, record_id: RecordId) -> Result<&Record> {
        self.inner.get(record_id)
    }

    pub fn contains(&self, record_id: RecordId) -> bool {
        self.inner.contains(record_id)
    }

    /// Owner check for a mutation by `caller`
    pub fn authorize(&self, record_id: RecordId, caller: &Principal) -> Result<&Record> {
        self.inner.authorize(record_id, caller)
    }

    /// Overwrite title and description in place. Returns the record as it was
    /// before the edit.
    pub fn update(
        &mut self,
        record_id: RecordId,
        caller: &Principal,
        title: String,
        description: String,
        now: Timestamp,
    ) -> Result<Record> {
        let record = self.inner.authorize_mut(record_id, caller)?;
        let before = record.clone();

        record.title = title;
        record.description = description;
        record.timestamp = now;

        Ok(before)
    }

    /// Drop the record from storage and its owner's index. No ownership check.
    pub fn remove(&mut self, record_id: RecordId) -> Result<Record> {
        self.inner.remove(record_id)
    }

    /// Records listed under `owner`, in index order.
    ///
    /// An id that no longer resolves yields `Record::default()` in its
    /// position, so the result always has the same length as the owner's id
    /// list.
    pub fn from_address(&self, owner: &Principal) -> Vec<Record> {
        self.inner.resolve_zero_filled(self.inner.owned_ids(owner))
    }

    pub fn owned_ids(&self, owner: &Principal) -> &[RecordId] {
        self.inner.owned_ids(owner)
    }

    /// Dense snapshot in current storage order
    pub fn all(&self) -> Vec<Record> {
        self.inner.items().as_slice().to_vec()
    }

    pub fn count(&self) -> usize {
        self.inner.len()
    }

    pub fn verify(&self) -> std::result::Result<(), String> {
        self.inner.verify()
    }

    #[cfg(test)]
    pub(crate) fn entities_mut(&mut self) -> &mut EntityStore<Record> {
        &mut self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StoreError;
    use chrono::{DateTime, Utc};

    fn at(secs: i64) -> Timestamp {
        DateTime::<Utc>::from_timestamp(secs, 0).unwrap()
    }

    fn record(id: RecordId, owner: &str, title: &str) -> Record {
        Record::new(id, owner.into(), title.to_string(), String::new(), at(1))
    }

    #[test]
    fn test_update_returns_previous_values() {
        let mut store = RecordStore::new();
        store.insert(record(1, "alice", "Rust"));

        let before = store
            .update(1, &"alice".into(), "Rust 2".into(), "ownership".into(), at(50))
            .unwrap();
        assert_eq!(before.title, "Rust");
        assert_eq!(before.timestamp, at(1));

        let now = store.get(1).unwrap();
        assert_eq!(now.title, "Rust 2");
        assert_eq!(now.description, "ownership");
        assert_eq!(now.timestamp, at(50));
        assert_eq!(now.owner, Principal::from("alice"));
    }

    #[test]
    fn test_update_by_stranger_changes_nothing() {
        let mut store = RecordStore::new();
        store.insert(record(1, "alice", "Rust"));

        let err = store
            .update(1, &"bob".into(), "hijack".into(), String::new(), at(9))
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized { .. }));
        assert_eq!(store.get(1).unwrap().title, "Rust");
        assert_eq!(store.get(1).unwrap().timestamp, at(1));
    }

    #[test]
    fn test_from_address_keeps_index_order() {
        let mut store = RecordStore::new();
        store.insert(record(1, "alice", "a"));
        store.insert(record(2, "bob", "b"));
        store.insert(record(3, "alice", "c"));
        store.remove(1).unwrap();

        let titles: Vec<String> = store
            .from_address(&"alice".into())
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["c"]);
        assert!(store.from_address(&"carol".into()).is_empty());
    }

    #[test]
    fn test_all_reflects_swap_order() {
        let mut store = RecordStore::new();
        for id in 1..=3 {
            store.insert(record(id, "alice", "x"));
        }
        store.remove(1).unwrap();

        let ids: Vec<RecordId> = store.all().iter().map(|r| r.record_id).collect();
        assert_eq!(ids, vec![3, 2]);
        assert_eq!(store.count(), 2);
    }
}
