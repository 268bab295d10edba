//! ttsync configuration.
//!
//! Loaded once per run from, in increasing priority:
//! defaults, `~/.config/ttsync/config.toml`, `.env`, `TTSYNC_*` environment
//! variables and finally the short legacy names `LOGIN`, `PASSWORD`, `ID` and
//! `ADDRESS`.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::{SyncError, SyncResult};

pub const DEFAULT_LOGIN_URL: &str = "https://e.muiv.ru/login/index.php";
pub const DEFAULT_TIMETABLE_URL: &str = "https://e.muiv.ru/local/student_timetable/view.php";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/105.0.0.0 Safari/537.36";
pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

const ENV_PREFIX: &str = "TTSYNC";

/// Legacy environment names and the keys they map to.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("LOGIN", "portal.username"),
    ("PASSWORD", "portal.password"),
    ("ID", "calendar.calendar_id"),
    ("ADDRESS", "calendar.address"),
];

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub portal: PortalConfig,
    pub calendar: CalendarConfig,
}

/// Portal credentials and URLs.
#[derive(Clone, Deserialize)]
pub struct PortalConfig {
    pub login_url: String,
    pub timetable_url: String,
    pub user_agent: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Target calendar settings.
#[derive(Debug, Clone, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub calendar_id: String,
    /// Physical address used as the location of every event
    #[serde(default)]
    pub address: String,
    /// Zone the portal's wall-clock times are in
    pub timezone: Tz,
}

impl fmt::Debug for PortalConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PortalConfig")
            .field("login_url", &self.login_url)
            .field("timetable_url", &self.timetable_url)
            .field("user_agent", &self.user_agent)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl CalendarConfig {
    /// Current wall-clock time in the portal's zone.
    pub fn local_now(&self) -> NaiveDateTime {
        self.local_time(Utc::now())
    }

    /// Wall-clock time of `at` in the portal's zone.
    pub fn local_time(&self, at: DateTime<Utc>) -> NaiveDateTime {
        at.with_timezone(&self.timezone).naive_local()
    }
}

impl Config {
    pub fn config_dir() -> SyncResult<PathBuf> {
        let dir = dirs::config_dir()
            .ok_or_else(|| SyncError::Config("Could not determine config directory".into()))?
            .join("ttsync");

        Ok(dir)
    }

    /// ~/.config/ttsync/config.toml
    pub fn config_path() -> SyncResult<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    pub fn load() -> SyncResult<Self> {
        // A missing .env is fine; values may come from the real environment
        let _ = dotenvy::dotenv();

        let path = Self::config_path()?;

        let mut builder = Self::defaults()?
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        Self::from_builder(builder)
    }

    fn defaults() -> SyncResult<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(config::Config::builder()
            .set_default("portal.login_url", DEFAULT_LOGIN_URL)?
            .set_default("portal.timetable_url", DEFAULT_TIMETABLE_URL)?
            .set_default("portal.user_agent", DEFAULT_USER_AGENT)?
            .set_default("calendar.timezone", DEFAULT_TIMEZONE)?)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> SyncResult<Self> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> SyncResult<()> {
        let required = [
            ("portal.username", &self.portal.username, "LOGIN"),
            ("portal.password", &self.portal.password, "PASSWORD"),
            ("calendar.calendar_id", &self.calendar.calendar_id, "ID"),
            ("calendar.address", &self.calendar.address, "ADDRESS"),
        ];

        for (key, value, env) in required {
            if value.trim().is_empty() {
                return Err(SyncError::Config(format!(
                    "'{}' is not set. Add it to the config file or set {} in the environment",
                    key, env
                )));
            }
        }

        Ok(())
    }
}
