//! Domain rules for tracking tasks and warranties: deadline classification,
//! form validation and the combined completion history.
pub mod deadline;
pub mod history;
pub mod record;
pub mod validation;

pub use deadline::{DayCount, DeadlineStatus, DeliveryStatus, classify, day_count, delivery_status};
pub use history::{HistoryEntry, build_history};
pub use record::{Record, RecordKind};
pub use validation::{RecordInput, ValidationError, validate_record};
