//! The in-memory audit trail.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use larkboard_core::types::id::MemberId;

/// One recorded audit event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The extension point the event came from.
    pub point: String,
    /// The acting member, when known.
    pub member: Option<MemberId>,
    /// Human-readable event detail.
    pub detail: String,
    /// When the record was taken.
    pub recorded_at: DateTime<Utc>,
}

/// Append-only audit trail shared by the audit listeners.
///
/// The trail lives for one dispatch scope; a host that wants durable audit
/// storage drains it at the end of the request.
#[derive(Debug, Default)]
pub struct AuditTrail {
    /// Recorded events, oldest first.
    records: Mutex<Vec<AuditRecord>>,
}

impl AuditTrail {
    /// Creates an empty trail.
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
        }
    }

    /// Appends a record.
    pub fn record(&self, point: &str, member: Option<MemberId>, detail: impl Into<String>) {
        let record = AuditRecord {
            point: point.to_string(),
            member,
            detail: detail.into(),
            recorded_at: Utc::now(),
        };
        self.records.lock().expect("audit trail poisoned").push(record);
    }

    /// Returns a snapshot of all records, oldest first.
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().expect("audit trail poisoned").clone()
    }

    /// Returns the number of records taken so far.
    pub fn len(&self) -> usize {
        self.records.lock().expect("audit trail poisoned").len()
    }

    /// Returns whether the trail is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns all records, oldest first.
    pub fn drain(&self) -> Vec<AuditRecord> {
        std::mem::take(&mut *self.records.lock().expect("audit trail poisoned"))
    }
}
