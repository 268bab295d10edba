//! Provider-neutral event types.
//!
//! The planner produces `EventDraft`s and the reconciler hands them to a
//! calendar service. Existing calendar entries come back as `ExistingEvent`,
//! which carries just enough to delete them.

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};

/// A calendar entry to be created. Times are naive local times; the calendar
/// service resolves them in its configured zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: String,
    pub location: String,
    pub reminders: Vec<Reminder>,
}

/// A popup reminder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
    /// Minutes before the event to trigger
    pub minutes: i64,
}

impl Reminder {
    pub const fn minutes_before(minutes: i64) -> Self {
        Reminder { minutes }
    }
}

/// An event already present on the target calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingEvent {
    /// Provider-specific event ID
    pub id: String,
    pub summary: String,
    pub start: Option<DateTime<Utc>>,
}

impl fmt::Display for EventDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl fmt::Display for ExistingEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.summary.is_empty() {
            write!(f, "{}", self.id)
        } else {
            write!(f, "{}", self.summary)
        }
    }
}
