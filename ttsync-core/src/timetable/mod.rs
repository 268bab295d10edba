//! Timetable page parsing.
//!
//! The portal renders the schedule as a flat list of siblings: a date marker
//! followed by the lesson table for that date, repeated. Parsing is a fold
//! over those siblings that carries the most recent date.

mod node;

pub use node::{Node, Row, container_nodes};

use chrono::{NaiveDate, NaiveTime};
use scraper::Html;
use thiserror::Error;

use crate::lesson::Lesson;

const DATE_FORMAT: &str = "%d.%m.%Y";
const TIME_FORMAT: &str = "%H:%M";

/// Ways a timetable page can fail to match the expected shape.
///
/// None of these are recovered from: a half-parsed schedule must never reach
/// the calendar.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimetableError {
    #[error("timetable container not found")]
    MissingContainer,

    #[error("invalid date marker '{0}', expected dd.mm.yyyy")]
    InvalidDate(String),

    #[error("lesson table found before any date marker")]
    LessonBeforeDate,

    #[error("malformed lesson row: {0}")]
    MalformedRow(String),

    #[error("invalid time range '{0}', expected HH:MM-HH:MM")]
    InvalidTimeRange(String),
}

/// Parse the timetable page into lessons, in document order.
pub fn parse_document(html: &str) -> Result<Vec<Lesson>, TimetableError> {
    let document = Html::parse_document(html);
    let nodes = container_nodes(&document).ok_or(TimetableError::MissingContainer)?;

    lessons_from_nodes(nodes)
}

/// Fold classified container children into lessons.
pub fn lessons_from_nodes(nodes: Vec<Node>) -> Result<Vec<Lesson>, TimetableError> {
    let state = nodes
        .into_iter()
        .try_fold(ParseState::default(), ParseState::apply)?;

    tracing::debug!(lessons = state.lessons.len(), "Parsed timetable");

    Ok(state.lessons)
}

#[derive(Default)]
struct ParseState {
    date: Option<NaiveDate>,
    lessons: Vec<Lesson>,
}

impl ParseState {
    fn apply(mut self, node: Node) -> Result<Self, TimetableError> {
        match node {
            Node::DateMarker(text) => {
                self.date = Some(parse_date(&text)?);
            }
            Node::LessonTable(rows) => {
                let date = self.date.ok_or(TimetableError::LessonBeforeDate)?;

                for row in rows {
                    if let Row::Cells(cells) = row {
                        self.lessons.push(parse_row(date, cells)?);
                    }
                }
            }
            Node::Other => {}
        }

        Ok(self)
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, TimetableError> {
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map_err(|_| TimetableError::InvalidDate(text.to_string()))
}

/// Build a lesson from the five cells of a row: time range, name, room,
/// type and teacher.
fn parse_row(date: NaiveDate, cells: Vec<String>) -> Result<Lesson, TimetableError> {
    let [time_range, name, room, kind, teacher]: [String; 5] =
        cells.try_into().map_err(|cells: Vec<String>| {
            TimetableError::MalformedRow(format!("expected 5 cells, found {}", cells.len()))
        })?;

    let (start, end) = parse_time_range(&time_range)?;

    if name.is_empty() {
        return Err(TimetableError::MalformedRow(format!(
            "lesson at {} has no name",
            time_range
        )));
    }

    Ok(Lesson {
        start_time: date.and_time(start),
        end_time: date.and_time(end),
        name,
        room,
        kind,
        teacher,
    })
}

fn parse_time_range(text: &str) -> Result<(NaiveTime, NaiveTime), TimetableError> {
    let invalid = || TimetableError::InvalidTimeRange(text.to_string());

    let parts: Vec<&str> = text.split('-').collect();
    let [start, end] = parts.as_slice() else {
        return Err(invalid());
    };

    let start = parse_clock(start).ok_or_else(invalid)?;
    let end = parse_clock(end).ok_or_else(invalid)?;

    if start >= end {
        return Err(invalid());
    }

    Ok((start, end))
}

/// Strict `HH:MM`: two digits, a colon, two digits.
fn parse_clock(text: &str) -> Option<NaiveTime> {
    let text = text.trim();
    let bytes = text.as_bytes();

    let well_formed = bytes.len() == 5
        && bytes[2] == b':'
        && [0, 1, 3, 4].iter().all(|&i| bytes[i].is_ascii_digit());
    if !well_formed {
        return None;
    }

    NaiveTime::parse_from_str(text, TIME_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timetable(body: &str) -> String {
        format!(
            "<html><body><div class=\"studtimetable\">{}</div></body></html>",
            body
        )
    }

    fn row(cells: &[&str]) -> String {
        let cells: String = cells.iter().map(|c| format!("<div>{}</div>", c)).collect();
        format!("<div class=\"tr\">{}</div>", cells)
    }

    fn table(rows: &[String]) -> String {
        format!(
            "<div class=\"table\"><div class=\"tr head\"><div>Time</div><div>Subject</div></div>{}</div>",
            rows.concat()
        )
    }

    fn date(text: &str) -> String {
        format!("<div class=\"ttdate\">{}</div>", text)
    }

    #[test]
    fn test_parse_lessons_under_their_date() {
        let html = timetable(&[
            date("01.09.2025"),
            table(&[
                row(&["09:00-10:30", "Math", "101", "Lecture", "Smith"]),
                row(&["10:40-12:10", " Physics ", "102", "Seminar", "Jones"]),
            ]),
            date("02.09.2025"),
            table(&[row(&["13:00-14:30", "History", "", "Lecture", "Brown"])]),
        ]
        .concat());

        let lessons = parse_document(&html).unwrap();

        assert_eq!(lessons.len(), 3);

        let first_day = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let second_day = NaiveDate::from_ymd_opt(2025, 9, 2).unwrap();

        assert_eq!(lessons[0].name, "Math");
        assert_eq!(lessons[0].start_time, first_day.and_hms_opt(9, 0, 0).unwrap());
        assert_eq!(lessons[0].end_time, first_day.and_hms_opt(10, 30, 0).unwrap());
        assert_eq!(lessons[0].room, "101");
        assert_eq!(lessons[0].kind, "Lecture");
        assert_eq!(lessons[0].teacher, "Smith");

        assert_eq!(lessons[1].name, "Physics");

        assert_eq!(lessons[2].room, "");
        assert_eq!(lessons[2].start_time.date(), second_day);

        for lesson in &lessons {
            assert!(lesson.start_time < lesson.end_time);
            assert_eq!(lesson.start_time.date(), lesson.end_time.date());
        }
    }

    #[test]
    fn test_keeps_document_order() {
        let html = timetable(&[
            date("01.09.2025"),
            table(&[
                row(&["12:00-13:00", "Late", "1", "Lecture", "A"]),
                row(&["08:00-09:00", "Early", "1", "Lecture", "A"]),
            ]),
        ]
        .concat());

        let names: Vec<_> = parse_document(&html)
            .unwrap()
            .into_iter()
            .map(|l| l.name)
            .collect();

        assert_eq!(names, vec!["Late", "Early"]);
    }

    #[test]
    fn test_lesson_before_date_fails() {
        let html = timetable(&[
            table(&[row(&["09:00-10:30", "Math", "101", "Lecture", "Smith"])]),
            date("01.09.2025"),
        ]
        .concat());

        assert_eq!(
            parse_document(&html),
            Err(TimetableError::LessonBeforeDate)
        );
    }

    #[test]
    fn test_short_row_fails() {
        let html = timetable(&[
            date("01.09.2025"),
            table(&[
                row(&["09:00-10:30", "Math", "101", "Lecture", "Smith"]),
                row(&["10:40-12:10", "Physics", "102", "Seminar"]),
            ]),
        ]
        .concat());

        assert!(matches!(
            parse_document(&html),
            Err(TimetableError::MalformedRow(_))
        ));
    }

    #[test]
    fn test_bad_time_range_fails() {
        for bad in [
            "09:00",
            "09:00-10:30-11:00",
            "9am-10am",
            "10:30-09:00",
            "",
            "9:00-10:30",
            "09:0-10:30",
            "09:00-10.30",
        ] {
            let html = timetable(&[
                date("01.09.2025"),
                table(&[row(&[bad, "Math", "101", "Lecture", "Smith"])]),
            ]
            .concat());

            assert_eq!(
                parse_document(&html),
                Err(TimetableError::InvalidTimeRange(bad.to_string())),
                "time cell {:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_bad_date_fails() {
        let html = timetable(&[
            date("2025-09-01"),
            table(&[row(&["09:00-10:30", "Math", "101", "Lecture", "Smith"])]),
        ]
        .concat());

        assert!(matches!(
            parse_document(&html),
            Err(TimetableError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_missing_container_fails() {
        assert_eq!(
            parse_document("<html><body><p>Maintenance</p></body></html>"),
            Err(TimetableError::MissingContainer)
        );
    }

    #[test]
    fn test_empty_timetable() {
        assert_eq!(parse_document(&timetable("")), Ok(vec![]));
    }
}
