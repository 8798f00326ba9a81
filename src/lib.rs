//! Ownership-gated store for records and the flashcards attached to them.
//!
//! [`KnowledgeStore`] is the operation surface. [`SharedStore`] wraps it for
//! use from several threads, and [`snapshot`] persists it as JSON.

pub mod clock;
pub mod config;
pub mod events;
pub mod flashcards;
pub mod records;
pub mod shared;
pub mod snapshot;
pub mod storage;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::StoreConfig;
pub use events::{Event, EventLog};
pub use flashcards::Flashcard;
pub use records::Record;
pub use shared::SharedStore;
pub use storage::{EntityKind, FlashcardId, Principal, RecordId, StoreError};
pub use store::KnowledgeStore;
