use serde::{Deserialize, Serialize};

use crate::storage::{EntityId, FlashcardId, Principal, RecordId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Event {
    RecordAdded {
        owner: Principal,
        title: String,
        description: String,
        timestamp: Timestamp,
        record_id: RecordId,
    },
    /// Emitted for record edits and for flashcard edits alike. For a
    /// flashcard, the title fields carry the question, the description fields
    /// carry the answer, and `id` is the flashcard id.
    RecordUpdated {
        owner: Principal,
        old_title: String,
        old_description: String,
        new_title: String,
        new_description: String,
        timestamp: Timestamp,
        id: EntityId,
    },
    RecordRemoved {
        owner: Principal,
        title: String,
        description: String,
        timestamp: Timestamp,
        record_id: RecordId,
    },
    /// Carries the parent record id, not the new flashcard's id
    FlashcardAdded {
        owner: Principal,
        question: String,
        answer: String,
        timestamp: Timestamp,
        record_id: RecordId,
    },
    FlashcardRemoved {
        owner: Principal,
        question: String,
        timestamp: Timestamp,
        flashcard_id: FlashcardId,
    },
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RecordAdded { .. } => "RecordAdded",
            Self::RecordUpdated { .. } => "RecordUpdated",
            Self::RecordRemoved { .. } => "RecordRemoved",
            Self::FlashcardAdded { .. } => "FlashcardAdded",
            Self::FlashcardRemoved { .. } => "FlashcardRemoved",
        }
    }

    pub fn owner(&self) -> &Principal {
        match self {
            Self::RecordAdded { owner, .. }
            | Self::RecordUpdated { owner, .. }
            | Self::RecordRemoved { owner, .. }
            | Self::FlashcardAdded { owner, .. }
            | Self::FlashcardRemoved { owner, .. } => owner,
        }
    }

    pub fn timestamp(&self) -> Timestamp {
        match self {
            Self::RecordAdded { timestamp, .. }
            | Self::RecordUpdated { timestamp, .. }
            | Self::RecordRemoved { timestamp, .. }
            | Self::FlashcardAdded { timestamp, .. }
            | Self::FlashcardRemoved { timestamp, .. } => *timestamp,
        }
    }

    /// The id field carried by the event (see the per-variant notes for which
    /// entity it names)
    pub fn subject_id(&self) -> EntityId {
        match self {
            Self::RecordAdded { record_id, .. }
            | Self::RecordRemoved { record_id, .. }
            | Self::FlashcardAdded { record_id, .. } => *record_id,
            Self::RecordUpdated { id, .. } => *id,
            Self::FlashcardRemoved { flashcard_id, .. } => *flashcard_id,
        }
    }
}
