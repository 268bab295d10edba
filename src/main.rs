mod commands;
mod render;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use ttsync_core::Config;

#[derive(Parser)]
#[command(name = "ttsync")]
#[command(about = "Sync your student portal timetable into Google Calendar")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect a Google account
    Auth,
    /// Replace all future events on the target calendar with the current timetable
    Sync,
    /// Show the lessons currently on the portal timetable
    Lessons,
    /// Show the events a sync would create, without touching the calendar
    Plan,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command).await {
        eprintln!("{} {:#}", "Error:".red(), e);
        std::process::exit(1);
    }
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Auth => commands::auth::run().await,
        Commands::Sync => commands::sync::run(Config::load()?).await,
        Commands::Lessons => commands::lessons::run(Config::load()?).await,
        Commands::Plan => commands::plan::run(Config::load()?).await,
    }
}
