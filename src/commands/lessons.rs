use anyhow::Result;
use owo_colors::OwoColorize;
use ttsync_core::Config;

use crate::render::{Render, date_heading};

pub async fn run(config: Config) -> Result<()> {
    let lessons = super::fetch_lessons(&config).await?;

    if lessons.is_empty() {
        println!("{}", "No lessons on the timetable".dimmed());
        return Ok(());
    }

    let mut current_date = None;

    for lesson in &lessons {
        let date = lesson.start_time.date();
        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_heading(date));
            current_date = Some(date);
        }
        println!("{}", lesson.render());
    }

    Ok(())
}
