//! The public operation surface: records, flashcards, and the notifications
//! they produce.
//!
//! Every mutating operation validates before it touches anything, so a failed
//! call leaves the store and the event log exactly as they were.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::StoreConfig;
use crate::events::{Event, EventLog, Observer, SubscriptionId};
use crate::flashcards::{Flashcard, FlashcardStore};
use crate::records::{Record, RecordStore};
use crate::storage::{
    EntityKind, FlashcardId, IdAllocator, Principal, RecordId, Result, StoreError,
};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnowledgeStore {
    ids: IdAllocator,
    records: RecordStore,
    flashcards: FlashcardStore,
    events: EventLog,
    #[serde(skip, default = "default_clock")]
    clock: Box<dyn Clock>,
}

fn default_clock() -> Box<dyn Clock> {
    Box::new(SystemClock)
}

impl Default for KnowledgeStore {
    fn default() -> Self {
        Self {
            ids: IdAllocator::new(),
            records: RecordStore::new(),
            flashcards: FlashcardStore::new(),
            events: EventLog::new(),
            clock: default_clock(),
        }
    }
}

impl fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("ids", &self.ids)
            .field("records", &self.records.count())
            .field("flashcards", &self.flashcards.count())
            .field("events", &self.events)
            .finish()
    }
}

fn rejected(operation: &str, err: StoreError) -> StoreError {
    log::warn!("{} rejected: {}", operation, err);
    err
}

impl KnowledgeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            ..Self::default()
        }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        let mut store = Self::new();
        store.apply_config(config);
        store
    }

    pub fn apply_config(&mut self, config: &StoreConfig) {
        self.events.set_recording(config.record_events);
    }

    pub fn set_clock(&mut self, clock: impl Clock + 'static) {
        self.clock = Box::new(clock);
    }

    // ==================== Record Operations ====================

    /// Create a record owned by `caller`. Empty strings are accepted.
    pub fn add_record(
        &mut self,
        caller: &Principal,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<RecordId> {
        let record_id = self
            .ids
            .next_record_id()
            .map_err(|e| rejected("add_record", e))?;
        let record = Record::new(
            record_id,
            caller.clone(),
            title.into(),
            description.into(),
            self.clock.now(),
        );

        let event = Event::RecordAdded {
            owner: record.owner.clone(),
            title: record.title.clone(),
            description: record.description.clone(),
            timestamp: record.timestamp,
            record_id,
        };
        self.records.insert(record);
        self.events.emit(event);

        Ok(record_id)
    }

    pub fn update_record(
        &mut self,
        caller: &Principal,
        record_id: RecordId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<()> {
        let title = title.into();
        let description = description.into();
        let now = self.clock.now();

        let before = self
            .records
            .update(record_id, caller, title.clone(), description.clone(), now)
            .map_err(|e| rejected("update_record", e))?;

        self.events.emit(Event::RecordUpdated {
            owner: before.owner,
            old_title: before.title,
            old_description: before.description,
            new_title: title,
            new_description: description,
            timestamp: now,
            id: record_id,
        });
        Ok(())
    }

    /// Remove a record owned by `caller`.
    ///
    /// Flashcards under the record that the caller owns are removed first.
    /// Flashcards other principals created under it stay stored and stay
    /// listed under the removed record id.
    pub fn remove_record(&mut self, caller: &Principal, record_id: RecordId) -> Result<()> {
        self.records
            .authorize(record_id, caller)
            .map_err(|e| rejected("remove_record", e))?;

        let children = self.flashcards.child_ids(record_id).to_vec();
        for flashcard_id in children {
            let owned_by_caller = self
                .flashcards
                .get(flashcard_id)
                .map(|card| &card.owner == caller)
                .unwrap_or(false);
            if owned_by_caller {
                self.remove_flashcard_internal(flashcard_id, caller)?;
            }
        }

        let record = self.records.remove(record_id)?;
        self.events.emit(Event::RecordRemoved {
            owner: record.owner,
            title: record.title,
            description: record.description,
            timestamp: self.clock.now(),
            record_id,
        });
        Ok(())
    }

    /// Records listed under `owner`. Stale ids come back as `Record::default()`.
    pub fn get_all_records_from_address(&self, owner: &Principal) -> Vec<Record> {
        self.records.from_address(owner)
    }

    /// Every live record, in storage order
    pub fn get_all_records(&self) -> Vec<Record> {
        self.records.all()
    }

    pub fn get_record(&self, record_id: RecordId) -> Result<&Record> {
        self.records.get(record_id)
    }

    pub fn record_count(&self) -> usize {
        self.records.count()
    }

    // ==================== Flashcard Operations ====================

    /// Create a flashcard owned by `caller` under an existing record
    pub fn add_flashcard(
        &mut self,
        caller: &Principal,
        record_id: RecordId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<FlashcardId> {
        if !self.records.contains(record_id) {
            return Err(rejected(
                "add_flashcard",
                StoreError::not_found(EntityKind::Record, record_id),
            ));
        }

        let flashcard_id = self
            .ids
            .next_flashcard_id()
            .map_err(|e| rejected("add_flashcard", e))?;
        let card = Flashcard::new(
            flashcard_id,
            record_id,
            caller.clone(),
            question.into(),
            answer.into(),
            self.clock.now(),
        );

        let event = Event::FlashcardAdded {
            owner: card.owner.clone(),
            question: card.question.clone(),
            answer: card.answer.clone(),
            timestamp: card.timestamp,
            record_id,
        };
        self.flashcards.insert(card);
        self.events.emit(event);

        Ok(flashcard_id)
    }

    /// Edit a flashcard. The notification uses the `RecordUpdated` shape.
    pub fn update_flashcard(
        &mut self,
        caller: &Principal,
        flashcard_id: FlashcardId,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<()> {
        let question = question.into();
        let answer = answer.into();
        let now = self.clock.now();

        let before = self
            .flashcards
            .update(flashcard_id, caller, question.clone(), answer.clone(), now)
            .map_err(|e| rejected("update_flashcard", e))?;

        self.events.emit(Event::RecordUpdated {
            owner: before.owner,
            old_title: before.question,
            old_description: before.answer,
            new_title: question,
            new_description: answer,
            timestamp: now,
            id: flashcard_id,
        });
        Ok(())
    }

    pub fn remove_flashcard(&mut self, caller: &Principal, flashcard_id: FlashcardId) -> Result<()> {
        self.flashcards
            .authorize(flashcard_id, caller)
            .map_err(|e| rejected("remove_flashcard", e))?;
        self.remove_flashcard_internal(flashcard_id, caller)
    }

    fn remove_flashcard_internal(&mut self, flashcard_id: FlashcardId, owner: &Principal) -> Result<()> {
        let card = self.flashcards.remove_internal(flashcard_id, owner)?;
        self.events.emit(Event::FlashcardRemoved {
            owner: card.owner,
            question: card.question,
            timestamp: self.clock.now(),
            flashcard_id,
        });
        Ok(())
    }

    /// Flashcards listed under a live record. Stale ids are skipped.
    pub fn get_all_flashcards_from_record(&self, record_id: RecordId) -> Result<Vec<Flashcard>> {
        if !self.records.contains(record_id) {
            return Err(StoreError::not_found(EntityKind::Record, record_id));
        }
        Ok(self.flashcards.from_record(record_id))
    }

    pub fn get_all_flashcards_from_address(&self, owner: &Principal) -> Vec<Flashcard> {
        self.flashcards.from_address(owner)
    }

    pub fn get_flashcard(&self, flashcard_id: FlashcardId) -> Result<&Flashcard> {
        self.flashcards.get(flashcard_id)
    }

    pub fn has_flashcards_under(&self, record_id: RecordId, owner: &Principal) -> bool {
        self.flashcards.has_flashcards_under(record_id, owner)
    }

    pub fn flashcard_count(&self) -> usize {
        self.flashcards.count()
    }

    // ==================== Events ====================

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventLog {
        &mut self.events
    }

    pub fn subscribe(&mut self, observer: Observer) -> SubscriptionId {
        self.events.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // ==================== Integrity ====================

    /// Cross-check every index against storage and the id counters.
    pub fn verify(&self) -> std::result::Result<(), String> {
        self.records.verify()?;
        self.flashcards.verify()?;

        let last_record = self.ids.last_issued(EntityKind::Record);
        if let Some(r) = self.records.all().iter().find(|r| r.record_id > last_record) {
            return Err(format!(
                "record {} is above the last issued id {}",
                r.record_id, last_record
            ));
        }

        let last_card = self.ids.last_issued(EntityKind::Flashcard);
        if let Some(c) = self
            .flashcards
            .all()
            .iter()
            .find(|c| c.flashcard_id > last_card)
        {
            return Err(format!(
                "flashcard {} is above the last issued id {}",
                c.flashcard_id, last_card
            ));
        }

        Ok(())
    }
}
