use std::fmt;
use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::models::Event;

pub type Observer = Box<dyn FnMut(&Event) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Append-only event log with synchronous observers.
///
/// Only the recorded events are persisted; observers are process-local.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventLog {
    events: Vec<Event>,
    #[serde(skip, default = "default_recording")]
    recording: bool,
    #[serde(skip)]
    observers: Vec<(SubscriptionId, Observer)>,
    #[serde(skip)]
    next_subscription: u64,
}

fn default_recording() -> bool {
    true
}

impl Default for EventLog {
    fn default() -> Self {
        Self {
            events: Vec::new(),
            recording: true,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }
}

impl fmt::Debug for EventLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventLog")
            .field("events", &self.events.len())
            .field("recording", &self.recording)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `recording` is false events are still delivered to observers but
    /// not kept.
    pub fn set_recording(&mut self, recording: bool) {
        self.recording = recording;
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    pub fn emit(&mut self, event: Event) {
        log::debug!("{} for {} ({})", event.name(), event.owner(), event.subject_id());

        for (_, observer) in self.observers.iter_mut() {
            observer(&event);
        }
        if self.recording {
            self.events.push(event);
        }
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, observer));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Events after the first `n`
    pub fn since(&self, n: usize) -> &[Event] {
        self.events.get(n..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn last(&self) -> Option<&Event> {
        self.events.last()
    }

    /// Take all recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    /// Write the events after the first `from` as JSON lines, oldest first
    pub fn write_jsonl<W: Write>(&self, from: usize, mut writer: W) -> io::Result<()> {
        for event in self.since(from) {
            let json = serde_json::to_string(event)
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }
}
