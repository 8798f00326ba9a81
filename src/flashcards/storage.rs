//! Flashcard storage.
//!
//! On top of the generic owner-gated store this keeps two extra structures:
//! - the record index: record id → flashcard ids created under it
//! - the holder set: (record id, owner) pairs for which the owner has at least
//!   one flashcard under that record

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::models::Flashcard;
use crate::storage::{
    EntityStore, FlashcardId, Principal, RecordId, Result, SecondaryIndex, Timestamp,
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardStore {
    cards: EntityStore<Flashcard>,
    by_record: SecondaryIndex<RecordId>,
    holders: HashSet<(RecordId, Principal)>,
}

impl FlashcardStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a card and link it under its record and owner.
    /// The caller has already checked that the record exists.
    pub fn insert(&mut self, card: Flashcard) {
        log::debug!(
            "Storing flashcard {} under record {} for {}",
            card.flashcard_id,
            card.corresponding_record_id,
            card.owner
        );
        self.by_record
            .push(&card.corresponding_record_id, card.flashcard_id);
        self.holders
            .insert((card.corresponding_record_id, card.owner.clone()));
        self.cards.insert(card);
    }

    pub fn get(&self, flashcard_id: FlashcardId) -> Result<&Flashcard> {
        self.cards.get(flashcard_id)
    }

    pub fn contains(&self, flashcard_id: FlashcardId) -> bool {
        self.cards.contains(flashcard_id)
    }

    pub fn authorize(&self, flashcard_id: FlashcardId, caller: &Principal) -> Result<&Flashcard> {
        self.cards.authorize(flashcard_id, caller)
    }

    /// Overwrite question and answer. Returns the card as it was before.
    pub fn update(
        &mut self,
        flashcard_id: FlashcardId,
        caller: &Principal,
        question: String,
        answer: String,
        now: Timestamp,
    ) -> Result<Flashcard> {
        let card = self.cards.authorize_mut(flashcard_id, caller)?;
        let before = card.clone();

        card.question = question;
        card.answer = answer;
        card.timestamp = now;

        Ok(before)
    }

    /// Unlink and drop a card owned by `owner`. No ownership check; this is the
    /// path shared by direct removal and the record cascade.
    ///
    /// After removal the owner's remaining cards are scanned, and the
    /// (record, owner) holder flag is cleared if none of them point at the
    /// same record.
    pub fn remove_internal(
        &mut self,
        flashcard_id: FlashcardId,
        owner: &Principal,
    ) -> Result<Flashcard> {
        let card = self.cards.remove(flashcard_id)?;
        let record_id = card.corresponding_record_id;
        self.by_record.remove(&record_id, flashcard_id);

        let still_holds = self.cards.owned_ids(owner).iter().any(|&id| {
            self.cards
                .get(id)
                .map(|c| c.corresponding_record_id == record_id)
                .unwrap_or(false)
        });
        if !still_holds {
            self.holders.remove(&(record_id, owner.clone()));
        }

        Ok(card)
    }

    /// Ids listed under `record_id`, in creation order
    pub fn child_ids(&self, record_id: RecordId) -> &[FlashcardId] {
        self.by_record.get(&record_id)
    }

    /// Cards listed under `record_id`. Ids that no longer resolve are skipped,
    /// so the result can be shorter than the record's id list.
    pub fn from_record(&self, record_id: RecordId) -> Vec<Flashcard> {
        self.cards.resolve_compacted(self.by_record.get(&record_id))
    }

    /// Cards owned by `owner`, in creation order
    pub fn from_address(&self, owner: &Principal) -> Vec<Flashcard> {
        self.cards.resolve_compacted(self.cards.owned_ids(owner))
    }

    pub fn owned_ids(&self, owner: &Principal) -> &[FlashcardId] {
        self.cards.owned_ids(owner)
    }

    pub fn has_flashcards_under(&self, record_id: RecordId, owner: &Principal) -> bool {
        self.holders.contains(&(record_id, owner.clone()))
    }

    pub fn all(&self) -> Vec<Flashcard> {
        self.cards.items().as_slice().to_vec()
    }

    pub fn count(&self) -> usize {
        self.cards.len()
    }

    pub fn verify(&self) -> std::result::Result<(), String> {
        self.cards.verify()?;

        for (&record_id, ids) in self.by_record.iter() {
            for &id in ids {
                let card = self
                    .cards
                    .get(id)
                    .map_err(|_| format!("record {} lists missing flashcard {}", record_id, id))?;
                if card.corresponding_record_id != record_id {
                    return Err(format!(
                        "flashcard {} belongs to record {} but is listed under {}",
                        id, card.corresponding_record_id, record_id
                    ));
                }
            }
        }

        for card in self.cards.items() {
            if !self
                .by_record
                .contains(&card.corresponding_record_id, card.flashcard_id)
            {
                return Err(format!(
                    "flashcard {} missing from record {} index",
                    card.flashcard_id, card.corresponding_record_id
                ));
            }
            if !self.has_flashcards_under(card.corresponding_record_id, &card.owner) {
                return Err(format!(
                    "holder flag missing for record {} and {}",
                    card.corresponding_record_id, card.owner
                ));
            }
        }

        for (record_id, owner) in &self.holders {
            let held = self.cards.owned_ids(owner).iter().any(|&id| {
                self.cards
                    .get(id)
                    .map(|c| c.corresponding_record_id == *record_id)
                    .unwrap_or(false)
            });
            if !held {
                return Err(format!(
                    "stale holder flag for record {} and {}",
                    record_id, owner
                ));
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn record_index_mut(&mut self) -> &mut SecondaryIndex<RecordId> {
        &mut self.by_record
    }

    #[cfg(test)]
    pub(crate) fn entities_mut(&mut self) -> &mut EntityStore<Flashcard> {
        &mut self.cards
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

    fn card(id: FlashcardId, record_id: RecordId, owner: &str) -> Flashcard {
        Flashcard::new(
            id,
            record_id,
            owner.into(),
            format!("q{}", id),
            format!("a{}", id),
            at(1),
        )
    }

    #[test]
    fn test_insert_links_record_and_owner() {
        let mut store = FlashcardStore::new();
        store.insert(card(1, 10, "alice"));
        store.insert(card(2, 10, "bob"));
        store.insert(card(3, 11, "alice"));

        assert_eq!(store.child_ids(10), &[1, 2]);
        assert_eq!(store.owned_ids(&"alice".into()), &[1, 3]);
        assert!(store.has_flashcards_under(10, &"bob".into()));
        assert!(!store.has_flashcards_under(11, &"bob".into()));
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_holder_flag_cleared_only_after_last_card() {
        let mut store = FlashcardStore::new();
        let alice = Principal::from("alice");
        store.insert(card(1, 10, "alice"));
        store.insert(card(2, 10, "alice"));
        store.insert(card(3, 11, "alice"));

        store.remove_internal(1, &alice).unwrap();
        assert!(store.has_flashcards_under(10, &alice));

        store.remove_internal(2, &alice).unwrap();
        assert!(!store.has_flashcards_under(10, &alice));
        assert!(store.has_flashcards_under(11, &alice));
        assert!(store.child_ids(10).is_empty());
        assert!(store.verify().is_ok());
    }

    #[test]
    fn test_update_gated_by_owner() {
        let mut store = FlashcardStore::new();
        store.insert(card(1, 10, "alice"));

        let err = store
            .update(1, &"bob".into(), "x".into(), "y".into(), at(5))
            .unwrap_err();
        assert!(matches!(err, StoreError::Unauthorized { .. }));

        let before = store
            .update(1, &"alice".into(), "Q".into(), "A".into(), at(5))
            .unwrap();
        assert_eq!(before.question, "q1");
        let after = store.get(1).unwrap();
        assert_eq!((after.question.as_str(), after.answer.as_str()), ("Q", "A"));
        assert_eq!(after.timestamp, at(5));
    }

    #[test]
    fn test_from_record_skips_stale_ids() {
        let mut store = FlashcardStore::new();
        store.insert(card(1, 10, "alice"));
        store.insert(card(2, 10, "alice"));
        store.record_index_mut().push(&10, 99);

        assert_eq!(store.child_ids(10).len(), 3);
        let cards = store.from_record(10);
        assert_eq!(cards.len(), 2);
        assert!(store.verify().is_err());
    }

    #[test]
    fn test_remove_missing_card() {
        let mut store = FlashcardStore::new();
        let err = store.remove_internal(4, &"alice".into()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 4, .. }));
    }
}
