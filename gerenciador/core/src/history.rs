use chrono::{DateTime, Utc};

use crate::deadline::DeliveryStatus;
use crate::record::{Record, RecordKind};

/// One completed task or warranty in the history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub kind: RecordKind,
    pub id: u32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub delivery: DeliveryStatus,
    /// Whole days between creation and completion.
    pub days_taken: i64,
}

impl HistoryEntry {
    fn from_record(record: Record) -> Option<Self> {
        let completed_at = record.completed_at?;
        let delivery = record.delivery_status();
        Some(Self {
            kind: record.kind,
            id: record.id,
            name: record.name,
            created_at: record.created_at,
            due_at: record.due_at,
            completed_at,
            delivery,
            days_taken: (completed_at - record.created_at).num_days(),
        })
    }
}

/// Merges records of any kind into the completion history.
///
/// Pending records are skipped. Entries are ordered by completion time, most
/// recent first; ties keep their input order.
pub fn build_history(records: impl IntoIterator<Item = Record>) -> Vec<HistoryEntry> {
    let mut entries: Vec<HistoryEntry> = records
        .into_iter()
        .filter_map(HistoryEntry::from_record)
        .collect();
    entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    entries
}
