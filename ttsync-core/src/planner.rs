//! Turns lessons into calendar event drafts.
//!
//! Reminders depend on how long the user has been free before a lesson: the
//! gap between the end of the previous lesson and the start of this one.

use chrono::{Duration, NaiveDateTime};

use crate::event::{EventDraft, Reminder};
use crate::lesson::Lesson;

/// Gaps at or above this get an early heads-up plus a closer nudge.
const LONG_GAP: Duration = Duration::hours(3);
/// Gaps at or above this (and below `LONG_GAP`) get a short nudge.
const SHORT_GAP: Duration = Duration::minutes(30);

const LONG_GAP_REMINDERS: [Reminder; 2] =
    [Reminder::minutes_before(80), Reminder::minutes_before(60)];
const SHORT_GAP_REMINDER: Reminder = Reminder::minutes_before(10);

/// Reminders for a lesson that starts `gap` after the previous activity ended.
pub fn reminders_for_gap(gap: Duration) -> Vec<Reminder> {
    if gap >= LONG_GAP {
        LONG_GAP_REMINDERS.to_vec()
    } else if gap >= SHORT_GAP {
        vec![SHORT_GAP_REMINDER]
    } else {
        vec![]
    }
}

/// Plan drafts for every lesson that starts strictly after `now`.
///
/// The gap cursor starts one day before the first lesson, even when that
/// lesson has already started. It only advances past lessons that get a
/// draft; dropped lessons leave it where it is.
pub fn plan(lessons: &[Lesson], now: NaiveDateTime, location: &str) -> Vec<EventDraft> {
    let Some(first) = lessons.first() else {
        return vec![];
    };

    let mut cursor = first.start_time - Duration::days(1);
    let mut drafts = Vec::new();

    for lesson in lessons {
        let (next, draft) = step(cursor, lesson, now, location);
        cursor = next;
        drafts.extend(draft);
    }

    tracing::debug!(
        lessons = lessons.len(),
        drafts = drafts.len(),
        "Planned calendar events"
    );

    drafts
}

/// One step of the planning fold: returns the next cursor and, for a future
/// lesson, its draft. A lesson that already started returns the cursor
/// unchanged.
pub fn step(
    cursor: NaiveDateTime,
    lesson: &Lesson,
    now: NaiveDateTime,
    location: &str,
) -> (NaiveDateTime, Option<EventDraft>) {
    if lesson.start_time <= now {
        return (cursor, None);
    }

    let gap = lesson.start_time - cursor;

    let draft = EventDraft {
        title: lesson.name.clone(),
        start: lesson.start_time,
        end: lesson.end_time,
        description: lesson.description(),
        location: location.to_string(),
        reminders: reminders_for_gap(gap),
    };

    (lesson.end_time, Some(draft))
}
