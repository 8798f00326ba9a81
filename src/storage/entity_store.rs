//! Generic owner-gated store: one [`IndexedCollection`] plus a per-owner
//! [`SecondaryIndex`]. Records and flashcards are both instantiations of it.

use serde::{Deserialize, Serialize};

use super::collection::IndexedCollection;
use super::errors::{Result, StoreError};
use super::index::SecondaryIndex;
use super::models::{Entity, EntityId, Principal};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: Entity + Deserialize<'de>"
))]
pub struct EntityStore<T> {
    items: IndexedCollection<T>,
    by_owner: SecondaryIndex<Principal>,
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self {
            items: IndexedCollection::default(),
            by_owner: SecondaryIndex::default(),
        }
    }
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, item: T) {
        self.by_owner.push(item.owner(), item.id());
        self.items.insert(item);
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.items.contains(id)
    }

    pub fn get(&self, id: EntityId) -> Result<&T> {
        self.items.get(id)
    }

    /// Look up `id` for a mutation by `caller`.
    ///
    /// `NotFound` takes precedence over `Unauthorized`.
    pub fn authorize(&self, id: EntityId, caller: &Principal) -> Result<&T> {
        let item = self.items.get(id)?;
        if item.owner() != caller {
            return Err(StoreError::Unauthorized {
                kind: T::KIND,
                id,
                caller: caller.clone(),
            });
        }
        Ok(item)
    }

    pub fn authorize_mut(&mut self, id: EntityId, caller: &Principal) -> Result<&mut T> {
        self.authorize(id, caller)?;
        self.items.get_mut(id)
    }

    /// Remove from the collection and from the owner's index
    pub fn remove(&mut self, id: EntityId) -> Result<T> {
        let item = self.items.remove_by_id(id)?;
        self.by_owner.remove(item.owner(), id);
        Ok(item)
    }

    pub fn owned_ids(&self, owner: &Principal) -> &[EntityId] {
        self.by_owner.get(owner)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &IndexedCollection<T> {
        &self.items
    }

    /// Resolve `ids`, dropping the ones that no longer exist
    pub fn resolve_compacted(&self, ids: &[EntityId]) -> Vec<T>
    where
        T: Clone,
    {
        ids.iter()
            .filter_map(|&id| self.items.get(id).ok())
            .cloned()
            .collect()
    }

    /// Resolve `ids`, substituting `T::default()` for the ones that no longer exist
    pub fn resolve_zero_filled(&self, ids: &[EntityId]) -> Vec<T>
    where
        T: Clone + Default,
    {
        ids.iter()
            .map(|&id| self.items.get(id).map(T::clone).unwrap_or_default())
            .collect()
    }

    pub fn verify(&self) -> std::result::Result<(), String> {
        self.items.verify()?;

        for (owner, ids) in self.by_owner.iter() {
            for &id in ids {
                let item = self
                    .items
                    .get(id)
                    .map_err(|_| format!("{}'s index lists missing {} {}", owner, T::KIND, id))?;
                if item.owner() != owner {
                    return Err(format!(
                        "{} {} owned by {} is indexed under {}",
                        T::KIND,
                        id,
                        item.owner(),
                        owner
                    ));
                }
            }
        }

        if self.by_owner.total() != self.items.len() {
            return Err(format!(
                "owner index holds {} {} ids for {} stored",
                self.by_owner.total(),
                T::KIND,
                self.items.len()
            ));
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn owner_index_mut(&mut self) -> &mut SecondaryIndex<Principal> {
        &mut self.by_owner
    }

    #[cfg(test)]
    pub(crate) fn items_mut(&mut self) -> &mut IndexedCollection<T> {
        &mut self.items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::models::EntityKind;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Note {
        id: EntityId,
        owner: Principal,
        body: String,
    }

    impl Entity for Note {
        const KIND: EntityKind = EntityKind::Flashcard;

        fn id(&self) -> EntityId {
            self.id
        }

        fn owner(&self) -> &Principal {
            &self.owner
        }
    }

    fn note(id: EntityId, owner: &str) -> Note {
        Note {
            id,
            owner: Principal::from(owner),
            body: format!("note {}", id),
        }
    }

    #[test]
    fn test_insert_updates_owner_index() {
        let mut store = EntityStore::new();
        store.insert(note(1, "alice"));
        store.insert(note(2, "bob"));
        store.insert(note(3, "alice"));

        assert_eq!(store.owned_ids(&"alice".into()), &[1, 3]);
        assert_eq!(store.owned_ids(&"bob".into()), &[2]);
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_authorize_checks_existence_first() {
        let mut store = EntityStore::new();
        store.insert(note(1, "alice"));

        let err = store.authorize(9, &"bob".into()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 9, .. }));

        let err = store.authorize_mut(1, &"bob".into()).unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized { id: 1, .. }));

        store.authorize_mut(1, &"alice".into()).unwrap().body = "edited".into();
        assert_eq!(store.get(1).unwrap().body, "edited");
    }

    #[test]
    fn test_remove_cleans_owner_index() {
        let mut store = EntityStore::new();
        store.insert(note(1, "alice"));
        store.insert(note(2, "alice"));

        let removed = store.remove(1).unwrap();
        assert_eq!(removed.id, 1);
        assert_eq!(store.owned_ids(&"alice".into()), &[2]);
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_stale_policies() {
        let mut store = EntityStore::new();
        store.insert(note(1, "alice"));
        store.insert(note(2, "alice"));

        let ids = [1, 5, 2];
        let compact = store.resolve_compacted(&ids);
        let filled = store.resolve_zero_filled(&ids);

        assert_eq!(compact.len(), 2);
        assert_eq!(filled.len(), 3);
        assert_eq!(filled[1], Note::default());
    }

    #[test]
    fn test_verify_flags_stale_owner_entry() {
        let mut store = EntityStore::new();
        store.insert(note(1, "alice"));
        store.owner_index_mut().push(&"alice".into(), 42);
        assert!(store.verify().unwrap_err().contains("missing"));
    }
}
