use anyhow::Result;
use owo_colors::OwoColorize;
use ttsync_core::{Config, planner};

use crate::render::{Render, date_heading};

pub async fn run(config: Config) -> Result<()> {
    let lessons = super::fetch_lessons(&config).await?;
    let drafts = planner::plan(
        &lessons,
        config.calendar.local_now(),
        &config.calendar.address,
    );

    if drafts.is_empty() {
        println!("{}", "No upcoming lessons to schedule".dimmed());
        return Ok(());
    }

    let mut current_date = None;

    for draft in &drafts {
        let date = draft.start.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_heading(date));
            current_date = Some(date);
        }
        println!("{}", draft.render());
    }

    println!(
        "\n{} {} would replace all future events on {}",
        drafts.len(),
        if drafts.len() == 1 { "event" } else { "events" },
        config.calendar.calendar_id.bold()
    );

    Ok(())
}
