use serde::{Deserialize, Serialize};

use super::errors::{Result, StoreError};
use super::models::{EntityId, EntityKind, FlashcardId, RecordId};

/// Issues strictly increasing identifiers, one counter per entity kind.
///
/// Counters start at 0 and are pre-incremented, so the first id is 1.
/// They are never reset; removing an entity does not free its id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdAllocator {
    last_record_id: RecordId,
    last_flashcard_id: FlashcardId,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_record_id(&mut self) -> Result<RecordId> {
        bump(&mut self.last_record_id, EntityKind::Record)
    }

    pub fn next_flashcard_id(&mut self) -> Result<FlashcardId> {
        bump(&mut self.last_flashcard_id, EntityKind::Flashcard)
    }

    /// Highest id issued so far for `kind` (0 if none)
    pub fn last_issued(&self, kind: EntityKind) -> EntityId {
        match kind {
            EntityKind::Record => self.last_record_id,
            EntityKind::Flashcard => self.last_flashcard_id,
        }
    }
}

fn bump(counter: &mut EntityId, kind: EntityKind) -> Result<EntityId> {
    let next = counter
        .checked_add(1)
        .ok_or(StoreError::CapacityExceeded(kind))?;
    *counter = next;
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_ids_are_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_record_id().unwrap(), 1);
        assert_eq!(ids.next_flashcard_id().unwrap(), 1);
        assert_eq!(ids.next_record_id().unwrap(), 2);
    }

    #[test]
    fn test_counters_are_independent() {
        let mut ids = IdAllocator::new();
        for _ in 0..5 {
            ids.next_record_id().unwrap();
        }
        assert_eq!(ids.next_flashcard_id().unwrap(), 1);
        assert_eq!(ids.last_issued(EntityKind::Record), 5);
        assert_eq!(ids.last_issued(EntityKind::Flashcard), 1);
    }

    #[test]
    fn test_exhaustion_fails_without_wrapping() {
        let mut ids = IdAllocator {
            last_record_id: u64::MAX,
            last_flashcard_id: 0,
        };
        let err = ids.next_record_id().unwrap_err();
        assert!(matches!(err, StoreError::CapacityExceeded(EntityKind::Record)));
        // counter left untouched
        assert_eq!(ids.last_issued(EntityKind::Record), u64::MAX);
        assert_eq!(ids.next_flashcard_id().unwrap(), 1);
    }
}
