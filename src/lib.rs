pub mod app;
pub mod calendar;
pub mod cli;
pub mod commands;
pub mod config;
pub mod state;

use anyhow::Result;
use log::*;

pub async fn run(cli: cli::Cli) -> Result<()> {
    info!("Starting unical");
    commands::execute(cli).await
}

// Re-export commonly used types
pub use app::AppState;
pub use calendar::{CalendarEvent, CalendarSource, FileImportResult};
pub use config::Config;
