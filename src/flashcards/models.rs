use serde::{Deserialize, Serialize};

use crate::storage::{Entity, EntityKind, FlashcardId, Principal, RecordId, Timestamp};

/// A question/answer pair.
///
/// `corresponding_record_id` names the record that existed when the card was
/// created; nothing keeps it pointing at a live record afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    pub owner: Principal,
    pub question: String,
    pub answer: String,
    pub timestamp: Timestamp,
    pub corresponding_record_id: RecordId,
    pub flashcard_id: FlashcardId,
}

impl Flashcard {
    pub fn new(
        flashcard_id: FlashcardId,
        corresponding_record_id: RecordId,
        owner: Principal,
        question: String,
        answer: String,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            owner,
            question,
            answer,
            timestamp,
            corresponding_record_id,
            flashcard_id,
        }
    }
}

impl Entity for Flashcard {
    const KIND: EntityKind = EntityKind::Flashcard;

    fn id(&self) -> FlashcardId {
        self.flashcard_id
    }

    fn owner(&self) -> &Principal {
        &self.owner
    }
}
