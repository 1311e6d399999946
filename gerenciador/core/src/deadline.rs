use chrono::{DateTime, Duration, Utc};

/// Where an item stands relative to its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeadlineStatus {
    Completed,
    Late,
    NearDue,
    Normal,
}

impl DeadlineStatus {
    /// Returns the label shown next to an item.
    pub fn label(&self) -> &'static str {
        match self {
            DeadlineStatus::Completed => "concluída",
            DeadlineStatus::Late => "atrasada",
            DeadlineStatus::NearDue => "prazo próximo",
            DeadlineStatus::Normal => "normal",
        }
    }
}

/// Whether a completed item was delivered before its due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryStatus {
    Pending,
    OnTime,
    Late,
}

impl DeliveryStatus {
    /// Returns the label shown in the history.
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryStatus::Pending => "pendente",
            DeliveryStatus::OnTime => "no prazo",
            DeliveryStatus::Late => "atrasada",
        }
    }
}

/// Classifies an item against the reference time `now`.
///
/// The near-due window is inclusive: an item due exactly `window` from now,
/// or due right now, is `NearDue`. Only a due time strictly before `now` is
/// `Late`.
pub fn classify(
    now: DateTime<Utc>,
    due_at: DateTime<Utc>,
    is_completed: bool,
    window: Duration,
) -> DeadlineStatus {
    if is_completed {
        DeadlineStatus::Completed
    } else if due_at < now {
        DeadlineStatus::Late
    } else if due_at - now <= window {
        DeadlineStatus::NearDue
    } else {
        DeadlineStatus::Normal
    }
}

/// Classifies how a completion relates to the due date.
///
/// A completed flag without a completion time cannot be judged and is
/// reported as `Pending`.
pub fn delivery_status(
    is_completed: bool,
    completed_at: Option<DateTime<Utc>>,
    due_at: DateTime<Utc>,
) -> DeliveryStatus {
    match (is_completed, completed_at) {
        (true, Some(completed_at)) if completed_at <= due_at => DeliveryStatus::OnTime,
        (true, Some(_)) => DeliveryStatus::Late,
        _ => DeliveryStatus::Pending,
    }
}

/// The day figure displayed alongside an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayCount {
    /// Days between creation and completion.
    Took(i64),
    /// Days since creation for an item already past its due date.
    OverdueSinceCreation(i64),
    /// Days left until the due date.
    Remaining(i64),
}

/// Counts whole days for display, truncating partial days.
pub fn day_count(
    now: DateTime<Utc>,
    created_at: DateTime<Utc>,
    due_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
) -> DayCount {
    match completed_at {
        Some(completed_at) => DayCount::Took((completed_at - created_at).num_days()),
        None if due_at < now => DayCount::OverdueSinceCreation((now - created_at).num_days()),
        None => DayCount::Remaining((due_at - now).num_days()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn can_classify_completed_regardless_of_dates() {
        let now = at(20, 12);
        assert_eq!(
            classify(now, at(1, 0), true, Duration::days(3)),
            DeadlineStatus::Completed
        );
    }

    #[test]
    fn can_classify_past_due_as_late() {
        let now = at(10, 12);
        let due = now - Duration::seconds(1);
        assert_eq!(
            classify(now, due, false, Duration::days(3)),
            DeadlineStatus::Late
        );
    }

    #[test]
    fn can_classify_zero_remaining_time_as_near_due() {
        let now = at(10, 12);
        assert_eq!(
            classify(now, now, false, Duration::days(3)),
            DeadlineStatus::NearDue
        );
    }

    #[test]
    fn can_classify_exact_window_boundary_as_near_due() {
        let now = at(10, 12);
        let window = Duration::days(3);
        assert_eq!(
            classify(now, now + window, false, window),
            DeadlineStatus::NearDue
        );
        assert_eq!(
            classify(now, now + window + Duration::seconds(1), false, window),
            DeadlineStatus::Normal
        );
    }

    #[test]
    fn can_classify_two_days_ahead_as_near_due_with_three_day_window() {
        let now = at(10, 9);
        assert_eq!(
            classify(now, now + Duration::days(2), false, Duration::days(3)),
            DeadlineStatus::NearDue
        );
    }

    #[test]
    fn can_report_pending_delivery_when_not_completed() {
        assert_eq!(
            delivery_status(false, None, at(10, 0)),
            DeliveryStatus::Pending
        );
        assert_eq!(
            delivery_status(true, None, at(10, 0)),
            DeliveryStatus::Pending
        );
    }

    #[test]
    fn can_treat_completion_at_due_time_as_on_time() {
        let due = at(10, 0);
        assert_eq!(
            delivery_status(true, Some(due), due),
            DeliveryStatus::OnTime
        );
        assert_eq!(
            delivery_status(true, Some(due - Duration::hours(5)), due),
            DeliveryStatus::OnTime
        );
    }

    #[test]
    fn can_report_late_delivery_one_day_after_due() {
        let due = at(10, 0);
        assert_eq!(
            delivery_status(true, Some(due + Duration::days(1)), due),
            DeliveryStatus::Late
        );
    }

    #[test]
    fn can_count_days_for_each_state() {
        let created = at(1, 0);
        let due = at(10, 0);

        assert_eq!(
            day_count(at(5, 0), created, due, Some(at(4, 12))),
            DayCount::Took(3)
        );
        assert_eq!(
            day_count(at(12, 0), created, due, None),
            DayCount::OverdueSinceCreation(11)
        );
        assert_eq!(
            day_count(at(7, 6), created, due, None),
            DayCount::Remaining(2)
        );
    }
}
