//! Google Calendar as the reconciliation target.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use google_calendar::Client;
use google_calendar::types::{MinAccessRole, OrderBy, SendUpdates};
use ttsync_core::{CalendarService, EventDraft, ExistingEvent, SyncError, SyncResult};

use crate::convert::{FromGoogle, ToGoogle, is_future};
use crate::session::Session;

pub struct GoogleCalendar {
    client: Client,
    timezone: Tz,
}

/// A calendar from the user's calendar list
#[derive(Debug, Clone)]
pub struct CalendarInfo {
    pub id: String,
    pub name: String,
    pub primary: bool,
}

/// Calendars the authenticated account can see.
pub async fn list_calendars(session: &Session) -> Result<Vec<CalendarInfo>> {
    let calendars = session
        .client()?
        .calendar_list()
        .list_all(MinAccessRole::default(), false, false)
        .await
        .context("Failed to fetch calendars")?
        .body;

    Ok(calendars
        .into_iter()
        .filter(|cal| !cal.id.is_empty())
        .map(|cal| CalendarInfo {
            id: cal.id,
            name: cal.summary,
            primary: cal.primary,
        })
        .collect())
}

impl GoogleCalendar {
    /// Connect with the stored session, refreshing it if needed.
    pub async fn connect(timezone: Tz) -> Result<Self> {
        let client = Session::load_valid().await?.client()?;

        Ok(GoogleCalendar { client, timezone })
    }

    async fn list(&self, calendar_id: &str, time_min: DateTime<Utc>) -> Result<Vec<ExistingEvent>> {
        let time_min_param = time_min.to_rfc3339();

        let response = self
            .client
            .events()
            .list_all(
                calendar_id,
                "",
                0,
                OrderBy::default(),
                &[],
                "", // search query
                &[],
                false,
                false,
                true, // expand recurring events so only future instances are removed
                "",
                &time_min_param,
                "",
                "",
            )
            .await
            .context("Failed to fetch events")?;

        Ok(response
            .body
            .into_iter()
            .filter(|e| !e.id.is_empty() && e.status != "cancelled")
            .map(ExistingEvent::from_google)
            .filter(|e| is_future(e, time_min))
            .collect())
    }

    async fn delete(&self, event: &ExistingEvent, calendar_id: &str) -> Result<()> {
        let result = self
            .client
            .events()
            .delete(calendar_id, &event.id, false, SendUpdates::None)
            .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("410") || error_str.contains("Gone") {
                    // Already deleted
                    Ok(())
                } else {
                    Err(e).with_context(|| format!("Failed to delete event: {}", event))
                }
            }
        }
    }

    async fn insert(&self, draft: &EventDraft, calendar_id: &str) -> Result<()> {
        let google_event = draft.to_google(self.timezone)?;

        self.client
            .events()
            .insert(
                calendar_id,
                0,
                0,
                false,
                SendUpdates::None,
                false,
                &google_event,
            )
            .await
            .with_context(|| format!("Failed to create event: {}", draft.title))?;

        Ok(())
    }
}

#[async_trait]
impl CalendarService for GoogleCalendar {
    async fn list_future_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> SyncResult<Vec<ExistingEvent>> {
        self.list(calendar_id, time_min).await.map_err(calendar_error)
    }

    async fn delete_event(&self, event: &ExistingEvent, calendar_id: &str) -> SyncResult<()> {
        self.delete(event, calendar_id).await.map_err(calendar_error)
    }

    async fn create_event(&self, draft: &EventDraft, calendar_id: &str) -> SyncResult<()> {
        self.insert(draft, calendar_id).await.map_err(calendar_error)
    }
}

fn calendar_error(e: anyhow::Error) -> SyncError {
    SyncError::Calendar(format!("{:#}", e))
}
