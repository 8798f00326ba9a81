use serde::{Deserialize, Serialize};

use crate::storage::{Entity, EntityKind, Principal, RecordId, Timestamp};

/// A knowledge entry. `owner` and `record_id` never change after creation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub owner: Principal,
    pub title: String,
    pub description: String,
    /// Last modified
    pub timestamp: Timestamp,
    pub record_id: RecordId,
}

impl Record {
    pub fn new(
        record_id: RecordId,
        owner: Principal,
        title: String,
        description: String,
        timestamp: Timestamp,
    ) -> Self {
        Self {
            owner,
            title,
            description,
            timestamp,
            record_id,
        }
    }

    /// True for the zero-filled placeholder returned for stale ids
    pub fn is_placeholder(&self) -> bool {
        self.record_id == 0
    }
}

impl Entity for Record {
    const KIND: EntityKind = EntityKind::Record;

    fn id(&self) -> RecordId {
        self.record_id
    }

    fn owner(&self) -> &Principal {
        &self.owner
    }
}
