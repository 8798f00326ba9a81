//! Records: titled knowledge entries owned by a principal

mod models;
mod storage;

pub use models::Record;
pub use storage::RecordStore;
