pub mod auth;
pub mod lessons;
pub mod plan;
pub mod sync;

use anyhow::Result;
use ttsync_core::portal::{PortalSession, TimetableSource};
use ttsync_core::{Config, Lesson, timetable};

use crate::utils::tui;

/// Log in to the portal and parse the current timetable.
pub async fn fetch_lessons(config: &Config) -> Result<Vec<Lesson>> {
    let spinner = tui::create_spinner("Fetching timetable");
    let result = async {
        let session = PortalSession::login(&config.portal).await?;
        let html = session.fetch_timetable().await?;
        Ok::<_, anyhow::Error>(timetable::parse_document(&html)?)
    }
    .await;
    spinner.finish_and_clear();

    result
}
