use anyhow::Result;
use owo_colors::OwoColorize;
use ttsync_core::portal::PortalSession;
use ttsync_core::{Config, SyncError, synchronize};
use ttsync_google::GoogleCalendar;

use crate::render::Render;
use crate::utils::tui;

pub async fn run(config: Config) -> Result<()> {
    let calendar = GoogleCalendar::connect(config.calendar.timezone).await?;

    let spinner = tui::create_spinner(format!("Syncing {}", config.calendar.calendar_id));
    let result = async {
        let session = PortalSession::login(&config.portal).await?;
        synchronize(&config, &session, &calendar).await
    }
    .await;
    spinner.finish_and_clear();

    match result {
        Ok(report) => {
            println!("{}", report.render());
            Ok(())
        }
        Err(SyncError::Reconcile(report)) => {
            println!("{}", report.render());
            println!("{}", "Some calendar operations failed:".red());
            for failure in &report.failures {
                println!("{}", failure.render());
            }
            Err(SyncError::Reconcile(report).into())
        }
        Err(e) => Err(e.into()),
    }
}
