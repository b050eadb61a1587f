use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::policy::EnginePolicy;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Deadline severity for coloring and sorting. Variants are declared
/// most-urgent-first so the derived ordering puts items needing attention
/// at the top of a sorted list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UrgencyTier {
    Overdue,
    DueToday,
    DueSoon,
    Normal,
}

impl UrgencyTier {
    pub fn as_str(self) -> &'static str {
        match self {
            UrgencyTier::Overdue => "overdue",
            UrgencyTier::DueToday => "dueToday",
            UrgencyTier::DueSoon => "dueSoon",
            UrgencyTier::Normal => "normal",
        }
    }
}

/// Whole days between `now` and the deadline, floored toward negative
/// infinity: a partial future day keeps its day count, and any instant at
/// or past the deadline lands on zero or below.
pub fn days_until_due(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (due_date - now).num_milliseconds().div_euclid(MILLIS_PER_DAY)
}

/// The one due-date rule: whole-day deltas only, window taken from the
/// policy. No other cutoff exists anywhere in the crate.
pub fn classify_urgency(
    policy: &EnginePolicy,
    due_date: DateTime<Utc>,
    now: DateTime<Utc>,
) -> UrgencyTier {
    match days_until_due(due_date, now) {
        d if d < 0 => UrgencyTier::Overdue,
        0 => UrgencyTier::DueToday,
        d if d <= policy.due_soon_window_days => UrgencyTier::DueSoon,
        _ => UrgencyTier::Normal,
    }
}
