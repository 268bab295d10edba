//! Google Calendar backend for ttsync.
//!
//! The backend manages its own credentials and tokens:
//!   ~/.config/ttsync/google/app_config.toml
//!   ~/.config/ttsync/google/session.toml

pub mod app_config;
pub mod auth;
mod calendar;
mod convert;
pub mod session;

pub use auth::authenticate;
pub use calendar::{CalendarInfo, GoogleCalendar, list_calendars};
pub use convert::{FromGoogle, ToGoogle};
