use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Numeric identifier shared by both entity kinds. Zero is never issued.
pub type EntityId = u64;
pub type RecordId = EntityId;
pub type FlashcardId = EntityId;

/// Last-modified time carried by every entity and notification
pub type Timestamp = DateTime<Utc>;

/// Identity of the caller performing an operation (e.g. an account address).
///
/// The empty principal is the "zero address" used by default-valued entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Principal(String);

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("<zero>")
        } else {
            f.write_str(&self.0)
        }
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Principal {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Which of the two entity kinds an id or error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Record,
    Flashcard,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Record => f.write_str("record"),
            Self::Flashcard => f.write_str("flashcard"),
        }
    }
}

/// Common shape of everything kept in an [`IndexedCollection`](super::IndexedCollection).
pub trait Entity {
    const KIND: EntityKind;

    fn id(&self) -> EntityId;

    fn owner(&self) -> &Principal;
}
