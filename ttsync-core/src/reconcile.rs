//! Calendar reconciliation.
//!
//! Every future event on the target calendar is deleted, then every draft is
//! created. There is no diffing and no rollback: a failed item is recorded
//! and the loop moves on, so a partial backend outage still syncs as much as
//! it can. Between the two phases the calendar has no future entries.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{SyncError, SyncResult};
use crate::event::{EventDraft, ExistingEvent};

/// The calendar backend the reconciler mutates.
#[async_trait]
pub trait CalendarService {
    /// Events on `calendar_id` starting at or after `time_min`.
    async fn list_future_events(
        &self,
        calendar_id: &str,
        time_min: DateTime<Utc>,
    ) -> SyncResult<Vec<ExistingEvent>>;

    async fn delete_event(&self, event: &ExistingEvent, calendar_id: &str) -> SyncResult<()>;

    async fn create_event(&self, draft: &EventDraft, calendar_id: &str) -> SyncResult<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete,
    Create,
}

/// A single calendar operation that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemFailure {
    pub action: Action,
    pub summary: String,
    pub reason: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub deleted: usize,
    pub created: usize,
    pub failures: Vec<ItemFailure>,
}

impl ReconcileReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of delete and create calls made
    pub fn attempted(&self) -> usize {
        self.deleted + self.created + self.failures.len()
    }

    fn record(&mut self, action: Action, summary: String, result: SyncResult<()>) {
        match result {
            Ok(()) => match action {
                Action::Delete => self.deleted += 1,
                Action::Create => self.created += 1,
            },
            Err(e) => {
                tracing::warn!(?action, %summary, error = %e, "Calendar operation failed");
                self.failures.push(ItemFailure {
                    action,
                    summary,
                    reason: e.to_string(),
                });
            }
        }
    }

    /// `Ok(self)` if every item succeeded, otherwise `SyncError::Reconcile`.
    pub fn into_result(self) -> SyncResult<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(SyncError::Reconcile(self))
        }
    }
}

/// Replace all events on `calendar_id` starting at or after `now` with
/// `drafts`.
///
/// Only a failure to list the existing events is returned as an error; item
/// failures end up in the report.
pub async fn reconcile<C: CalendarService + ?Sized>(
    service: &C,
    calendar_id: &str,
    drafts: &[EventDraft],
    now: DateTime<Utc>,
) -> SyncResult<ReconcileReport> {
    let existing = service.list_future_events(calendar_id, now).await?;

    tracing::info!(
        existing = existing.len(),
        planned = drafts.len(),
        "Reconciling calendar"
    );

    let mut report = ReconcileReport::default();

    for event in &existing {
        let result = service.delete_event(event, calendar_id).await;
        report.record(Action::Delete, event.to_string(), result);
    }

    for draft in drafts {
        let result = service.create_event(draft, calendar_id).await;
        report.record(Action::Create, draft.to_string(), result);
    }

    tracing::info!(
        deleted = report.deleted,
        created = report.created,
        failed = report.failures.len(),
        "Reconciled calendar"
    );

    Ok(report)
}
