use anyhow::Result;
use owo_colors::OwoColorize;
use ttsync_google::{authenticate, list_calendars};

pub async fn run() -> Result<()> {
    println!("Authenticating with Google...");

    let session = authenticate().await?;
    let calendars = list_calendars(&session).await?;

    println!("\n{}", "Authenticated.".green());
    println!("\nCalendars on this account:\n");
    for cal in &calendars {
        let marker = if cal.primary { " (primary)" } else { "" };
        println!("  {}{}  {}", cal.name, marker.dimmed(), cal.id.dimmed());
    }

    println!("\nSet the target calendar in config.toml:");
    println!();
    println!("[calendar]");
    println!("calendar_id = \"primary\"");

    Ok(())
}
