//! Notifications emitted for every successful mutation.
//!
//! The log is append-only and ordered by operation completion. Observers are
//! called synchronously, in subscription order, as each event is appended.

mod journal;
mod models;

pub use journal::{EventLog, Observer, SubscriptionId};
pub use models::Event;
