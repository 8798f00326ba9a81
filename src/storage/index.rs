use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use super::models::EntityId;

/// Groups ids under a key (an owner, or a parent record id).
///
/// Each group keeps insertion order. Removal is stable and O(n) in the group.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "K: Serialize + Eq + Hash",
    deserialize = "K: Deserialize<'de> + Eq + Hash"
))]
#[serde(transparent)]
pub struct SecondaryIndex<K> {
    groups: HashMap<K, Vec<EntityId>>,
}

impl<K> Default for SecondaryIndex<K> {
    fn default() -> Self {
        Self {
            groups: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash + Clone> SecondaryIndex<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: &K, id: EntityId) {
        self.groups.entry(key.clone()).or_default().push(id);
    }

    /// Remove the first occurrence of `id` under `key`.
    /// Returns false if it was not there.
    pub fn remove(&mut self, key: &K, id: EntityId) -> bool {
        let Some(ids) = self.groups.get_mut(key) else {
            return false;
        };
        let Some(pos) = ids.iter().position(|&x| x == id) else {
            return false;
        };
        ids.remove(pos);
        if ids.is_empty() {
            self.groups.remove(key);
        }
        true
    }

    /// Ids under `key` in insertion order (empty if the key is unknown)
    pub fn get(&self, key: &K) -> &[EntityId] {
        self.groups.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &K, id: EntityId) -> bool {
        self.get(key).contains(&id)
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.groups.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &[EntityId])> {
        self.groups.iter().map(|(k, ids)| (k, ids.as_slice()))
    }

    /// Total number of ids across all groups
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_keeps_insertion_order() {
        let mut idx = SecondaryIndex::new();
        idx.push(&"a", 3);
        idx.push(&"a", 1);
        idx.push(&"b", 2);
        assert_eq!(idx.get(&"a"), &[3, 1]);
        assert_eq!(idx.get(&"b"), &[2]);
        assert_eq!(idx.get(&"c"), &[] as &[EntityId]);
        assert_eq!(idx.total(), 3);
    }

    #[test]
    fn test_remove_is_stable() {
        let mut idx = SecondaryIndex::new();
        for id in 1..=5 {
            idx.push(&7u64, id);
        }
        assert!(idx.remove(&7, 2));
        assert_eq!(idx.get(&7), &[1, 3, 4, 5]);
        assert!(!idx.remove(&7, 2));
        assert!(!idx.remove(&8, 1));
    }

    #[test]
    fn test_empty_groups_are_dropped() {
        let mut idx = SecondaryIndex::new();
        idx.push(&"a", 1);
        idx.remove(&"a", 1);
        assert_eq!(idx.keys().count(), 0);
    }
}
