use chrono::{DateTime, Duration, Utc};
use std::fmt;

use crate::deadline::{self, DayCount, DeadlineStatus, DeliveryStatus};

/// Default near-due window for tasks, in days.
pub const TASK_NEAR_DUE_DAYS: i64 = 3;
/// Default near-expiry window for warranties, in days.
pub const WARRANTY_NEAR_DUE_DAYS: i64 = 30;

/// The two kinds of tracked items. They share one shape and one set of rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Task,
    Warranty,
}

impl RecordKind {
    /// Returns the identifier used in URLs, e.g. `/adicionar_tarefa`.
    pub fn slug(&self) -> &'static str {
        match self {
            RecordKind::Task => "tarefa",
            RecordKind::Warranty => "garantia",
        }
    }

    /// Returns the capitalised display name.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Task => "Tarefa",
            RecordKind::Warranty => "Garantia",
        }
    }

    pub fn default_near_due_window(&self) -> Duration {
        match self {
            RecordKind::Task => Duration::days(TASK_NEAR_DUE_DAYS),
            RecordKind::Warranty => Duration::days(WARRANTY_NEAR_DUE_DAYS),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Task => write!(f, "task"),
            RecordKind::Warranty => write!(f, "warranty"),
        }
    }
}

/// A task or warranty as seen by the domain rules.
///
/// `completed_at` being present is what makes a record completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub id: u32,
    pub kind: RecordKind,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub due_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Record {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Classifies the record against `now` using the given near-due window.
    pub fn deadline_status(&self, now: DateTime<Utc>, window: Duration) -> DeadlineStatus {
        deadline::classify(now, self.due_at, self.is_completed(), window)
    }

    pub fn delivery_status(&self) -> DeliveryStatus {
        deadline::delivery_status(self.is_completed(), self.completed_at, self.due_at)
    }

    pub fn day_count(&self, now: DateTime<Utc>) -> DayCount {
        deadline::day_count(now, self.created_at, self.due_at, self.completed_at)
    }
}
