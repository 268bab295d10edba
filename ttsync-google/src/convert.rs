//! Conversions between ttsync event types and Google API types.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use google_calendar::types::{Event, EventDateTime, EventReminder, Reminders};
use ttsync_core::{EventDraft, ExistingEvent};

pub trait ToGoogle {
    /// Convert, resolving naive local times in `tz`.
    fn to_google(&self, tz: Tz) -> Result<Event>;
}

pub trait FromGoogle {
    fn from_google(event: Event) -> Self;
}

impl ToGoogle for EventDraft {
    fn to_google(&self, tz: Tz) -> Result<Event> {
        let reminders = Reminders {
            overrides: self
                .reminders
                .iter()
                .map(|r| EventReminder {
                    method: "popup".to_string(),
                    minutes: r.minutes,
                })
                .collect(),
            use_default: false,
        };

        Ok(Event {
            summary: self.title.clone(),
            description: self.description.clone(),
            location: self.location.clone(),
            start: Some(local_time_to_google(self.start, tz)?),
            end: Some(local_time_to_google(self.end, tz)?),
            reminders: Some(reminders),
            ..Default::default()
        })
    }
}

impl FromGoogle for ExistingEvent {
    fn from_google(event: Event) -> Self {
        let start = event.start.as_ref().and_then(|start| {
            start
                .date_time
                .or_else(|| start.date.and_then(|d| d.and_hms_opt(0, 0, 0)).map(|dt| dt.and_utc()))
        });

        ExistingEvent {
            id: event.id,
            summary: event.summary,
            start,
        }
    }
}

/// Google's `timeMin` matches on event end, so lessons still in progress come
/// back from a listing. Only events starting at or after `time_min` count.
pub fn is_future(event: &ExistingEvent, time_min: DateTime<Utc>) -> bool {
    event.start.is_none_or(|start| start >= time_min)
}

fn local_time_to_google(time: NaiveDateTime, tz: Tz) -> Result<EventDateTime> {
    let resolved: DateTime<Utc> = tz
        .from_local_datetime(&time)
        .earliest()
        .with_context(|| format!("{} does not exist in time zone {}", time, tz.name()))?
        .with_timezone(&Utc);

    Ok(EventDateTime {
        date: None,
        date_time: Some(resolved),
        time_zone: tz.name().to_string(),
    })
}
