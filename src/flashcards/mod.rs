//! Flashcards: question/answer pairs attached to a record

mod models;
mod storage;

pub use models::Flashcard;
pub use storage::FlashcardStore;
