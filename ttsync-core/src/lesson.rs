//! Lessons scraped from the portal timetable.

use std::fmt;

use chrono::NaiveDateTime;

/// One scheduled class occurrence.
///
/// Times are naive and expressed in the portal's local time zone. The parser
/// guarantees `start_time < end_time` and that both fall on the date of the
/// date marker the lesson was listed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub name: String,
    pub room: String,
    /// Lesson category (lecture, seminar, ...)
    pub kind: String,
    pub teacher: String,
}

impl Lesson {
    /// Event description in the form `"{teacher}\n{kind}, {room}"`.
    pub fn description(&self) -> String {
        format!("{}\n{}, {}", self.teacher, self.kind, self.room)
    }
}

impl fmt::Display for Lesson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{} {}",
            self.start_time.format("%H:%M"),
            self.end_time.format("%H:%M"),
            self.name
        )
    }
}
