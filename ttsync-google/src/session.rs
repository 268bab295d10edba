//! Keeps a valid Google session (access token) for calling the Calendar API.
//!
//! Tokens are stored at ~/.config/ttsync/google/session.toml

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use google_calendar::{AccessToken, Client};
use serde::{Deserialize, Serialize};

use crate::app_config::{AppConfig, base_dir};

pub struct Session {
    data: SessionData,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionData {
    access_token: String,
    refresh_token: String,
    expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for SessionData {
    fn from(tokens: &AccessToken) -> Self {
        SessionData::from_tokens(
            tokens.access_token.clone(),
            tokens.refresh_token.clone(),
            tokens.expires_in,
        )
    }
}

impl SessionData {
    pub fn from_tokens(access_token: String, refresh_token: String, expires_in: i64) -> Self {
        let expires_at = Utc::now() + Duration::seconds(expires_in);

        SessionData {
            access_token,
            refresh_token,
            expires_at,
        }
    }

    /// Google usually omits the refresh token on refresh, in which case the
    /// current one is kept.
    fn refreshed(&self, refreshed: SessionData) -> Self {
        if refreshed.refresh_token.is_empty() {
            SessionData {
                refresh_token: self.refresh_token.clone(),
                ..refreshed
            }
        } else {
            refreshed
        }
    }

    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl Session {
    pub fn new(data: SessionData) -> Self {
        Session { data }
    }

    fn path() -> Result<PathBuf> {
        Ok(base_dir()?.join("session.toml"))
    }

    pub fn client(&self) -> Result<Client> {
        let app_config = AppConfig::load()?;

        Ok(Client::new(
            app_config.client_id,
            app_config.client_secret,
            String::new(),
            self.data.access_token.clone(),
            self.data.refresh_token.clone(),
        ))
    }

    /// Load the stored session and refresh it if expired.
    pub async fn load_valid() -> Result<Self> {
        let mut session = Self::load()?;

        if session.data.is_expired(Utc::now()) {
            session.refresh().await?;
        }

        Ok(session)
    }

    fn load() -> Result<Self> {
        let path = Self::path()?;

        if !path.exists() {
            anyhow::bail!("Google session not found. Run `ttsync auth` first.");
        }

        let contents = std::fs::read_to_string(&path).with_context(|| {
            format!("Failed to read Google session from {}", path.display())
        })?;

        let data: SessionData = toml::from_str(&contents).with_context(|| {
            format!("Failed to parse Google session from {}", path.display())
        })?;

        Ok(Session { data })
    }

    pub fn save(&self) -> Result<()> {
        let contents = toml::to_string_pretty(&self.data).context("Failed to serialize session")?;

        let path = Self::path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(&path, contents)
            .with_context(|| format!("Failed to write session to {}", path.display()))?;

        // Set to owner-only (0600) since file contains OAuth tokens:
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
        }

        Ok(())
    }

    async fn refresh(&mut self) -> Result<()> {
        tracing::debug!("Refreshing expired Google access token");

        let tokens = self
            .client()?
            .refresh_access_token()
            .await
            .context("Failed to refresh token")?;

        self.data = self.data.refreshed(SessionData::from(&tokens));
        self.save()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> SessionData {
        SessionData {
            access_token: "old-access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() - Duration::minutes(1),
        }
    }

    #[test]
    fn test_refresh_keeps_refresh_token_when_google_omits_it() {
        let fresh = SessionData::from_tokens("new-access".into(), String::new(), 3600);

        let data = stored().refreshed(fresh);

        assert_eq!(data.access_token, "new-access");
        assert_eq!(data.refresh_token, "refresh");
        assert!(!data.is_expired(Utc::now()));
    }

    #[test]
    fn test_refresh_takes_rotated_refresh_token() {
        let fresh = SessionData::from_tokens("new-access".into(), "rotated".into(), 3600);

        assert_eq!(stored().refreshed(fresh).refresh_token, "rotated");
    }

    #[test]
    fn test_expiry() {
        assert!(stored().is_expired(Utc::now()));
    }
}
