//! The synchronize entry point: scrape, plan, reconcile.

use chrono::Utc;

use crate::config::Config;
use crate::error::SyncResult;
use crate::planner;
use crate::portal::TimetableSource;
use crate::reconcile::{self, CalendarService, ReconcileReport};
use crate::timetable;

/// Counts from a successful run.
pub type SyncReport = ReconcileReport;

/// Replace the future window of the configured calendar with the current
/// timetable.
///
/// Fetch and parse errors abort before the calendar is touched. If any
/// calendar item fails the whole run fails with `SyncError::Reconcile`, which
/// carries the report of what did get through.
pub async fn synchronize<S, C>(config: &Config, source: &S, calendar: &C) -> SyncResult<SyncReport>
where
    S: TimetableSource + ?Sized,
    C: CalendarService + ?Sized,
{
    let page = source.fetch_timetable().await?;
    let lessons = timetable::parse_document(&page)?;

    // One instant for both the planning cutoff and the calendar window
    let now = Utc::now();
    let drafts = planner::plan(
        &lessons,
        config.calendar.local_time(now),
        &config.calendar.address,
    );

    tracing::info!(
        lessons = lessons.len(),
        drafts = drafts.len(),
        "Prepared timetable"
    );

    reconcile::reconcile(calendar, &config.calendar.calendar_id, &drafts, now)
        .await?
        .into_result()
}
