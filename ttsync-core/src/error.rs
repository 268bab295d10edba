//! Error types for ttsync.

use thiserror::Error;

use crate::reconcile::ReconcileReport;
use crate::timetable::TimetableError;

/// Errors that can occur while synchronizing a timetable.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Portal login failed: {0}")]
    Auth(String),

    #[error("Portal request failed: {0}")]
    Transport(String),

    #[error("Timetable error: {0}")]
    Timetable(#[from] TimetableError),

    #[error("Calendar error: {0}")]
    Calendar(String),

    #[error("{} of {} calendar operations failed", .0.failures.len(), .0.attempted())]
    Reconcile(ReconcileReport),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(e: reqwest::Error) -> Self {
        SyncError::Transport(e.to_string())
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(e: config::ConfigError) -> Self {
        SyncError::Config(e.to_string())
    }
}

/// Result type alias for ttsync operations.
pub type SyncResult<T> = Result<T, SyncError>;
