//! Dense swap-remove arena keyed by entity id.
//!
//! Items live in a `Vec` in insertion order until a removal happens. Removing
//! an item moves the last item into the freed slot, so positions are not stable
//! across removals; only id lookups are.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::errors::{Result, StoreError};
use super::models::{Entity, EntityId};

#[derive(Debug, Clone)]
pub struct IndexedCollection<T> {
    items: Vec<T>,
    index: HashMap<EntityId, usize>,
    live: HashSet<EntityId>,
}

impl<T> Default for IndexedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            live: HashSet::new(),
        }
    }
}

impl<T: Entity> IndexedCollection<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a collection from its dense item array.
    ///
    /// Fails on a zero or duplicated id.
    pub fn from_items(items: Vec<T>) -> std::result::Result<Self, String> {
        let mut collection = Self::default();
        for item in items {
            let id = item.id();
            if id == 0 {
                return Err(format!("{} with id 0", T::KIND));
            }
            if collection.contains(id) {
                return Err(format!("duplicate {} id {}", T::KIND, id));
            }
            collection.insert(item);
        }
        Ok(collection)
    }

    /// Append an item and return the slot it landed in.
    ///
    /// The caller guarantees the id is fresh.
    pub fn insert(&mut self, item: T) -> usize {
        let id = item.id();
        debug_assert!(!self.live.contains(&id), "id {} inserted twice", id);

        let slot = self.items.len();
        self.items.push(item);
        self.index.insert(id, slot);
        self.live.insert(id);
        slot
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.live.contains(&id)
    }

    pub fn get(&self, id: EntityId) -> Result<&T> {
        let slot = self.slot_of(id)?;
        Ok(&self.items[slot])
    }

    pub fn get_mut(&mut self, id: EntityId) -> Result<&mut T> {
        let slot = self.slot_of(id)?;
        Ok(&mut self.items[slot])
    }

    /// Remove by id in O(1) by swapping the last item into the freed slot.
    pub fn remove_by_id(&mut self, id: EntityId) -> Result<T> {
        let slot = self.slot_of(id)?;
        let last = self.items.len() - 1;

        let removed = self.items.swap_remove(slot);
        if slot != last {
            let moved_id = self.items[slot].id();
            self.index.insert(moved_id, slot);
        }

        self.index.remove(&id);
        self.live.remove(&id);
        Ok(removed)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in current array order
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.items.iter().map(Entity::id)
    }

    /// Check that the id map, the existence set and the array agree.
    /// Returns a description of the first inconsistency found.
    pub fn verify(&self) -> std::result::Result<(), String> {
        if self.index.len() != self.items.len() || self.live.len() != self.items.len() {
            return Err(format!(
                "{} collection holds {} items but {} index entries and {} live ids",
                T::KIND,
                self.items.len(),
                self.index.len(),
                self.live.len()
            ));
        }

        for (slot, item) in self.items.iter().enumerate() {
            let id = item.id();
            if !self.live.contains(&id) {
                return Err(format!("{} {} in slot {} is not marked live", T::KIND, id, slot));
            }
            match self.index.get(&id) {
                Some(&indexed) if indexed == slot => {}
                Some(&indexed) => {
                    return Err(format!(
                        "{} {} is in slot {} but indexed at {}",
                        T::KIND,
                        id,
                        slot,
                        indexed
                    ))
                }
                None => return Err(format!("{} {} has no index entry", T::KIND, id)),
            }
        }

        Ok(())
    }

    fn slot_of(&self, id: EntityId) -> Result<usize> {
        if !self.live.contains(&id) {
            return Err(StoreError::not_found(T::KIND, id));
        }
        self.index
            .get(&id)
            .copied()
            .ok_or(StoreError::not_found(T::KIND, id))
    }
}

impl<'a, T> IntoIterator for &'a IndexedCollection<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// Only the dense array is persisted; the id maps are rebuilt on load.
impl<T: Serialize> Serialize for IndexedCollection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Entity + Deserialize<'de>> Deserialize<'de> for IndexedCollection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let items = Vec::<T>::deserialize(deserializer)?;
        Self::from_items(items).map_err(serde::de::Error::custom)
    }
}
