//! Core of ttsync.
//!
//! - `timetable`: parses the portal's timetable page into `Lesson`s
//! - `planner`: turns lessons into `EventDraft`s with gap-based reminders
//! - `reconcile`: replaces future calendar events with the drafts
//! - `portal`: logs in to the portal and fetches the timetable page
//! - `sync`: wires the above into a single run

pub mod config;
pub mod error;
pub mod event;
pub mod lesson;
pub mod planner;
pub mod portal;
pub mod reconcile;
pub mod sync;
pub mod timetable;

pub use config::Config;
pub use error::{SyncError, SyncResult};
pub use event::{EventDraft, ExistingEvent, Reminder};
pub use lesson::Lesson;
pub use reconcile::{CalendarService, ReconcileReport};
pub use sync::{SyncReport, synchronize};
