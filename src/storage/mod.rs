pub mod collection;
pub mod entity_store;
mod errors;
pub mod ids;
pub mod index;
mod models;

pub use collection::IndexedCollection;
pub use entity_store::EntityStore;
pub use errors::{Result, StoreError};
pub use ids::IdAllocator;
pub use index::SecondaryIndex;
pub use models::*;
