use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// unical - one calendar for Google, Outlook, Apple and local events
#[derive(Debug, Parser)]
#[command(name = "unical")]
#[command(about = "Unified calendar with ICS, CSV and JSON import", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding events.json (defaults to ~/.unical)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Import events from ICS, CSV or JSON files
    Import {
        /// Files to import, processed in order
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Source the events are imported into
        #[arg(long)]
        source: Option<String>,
    },

    /// List or toggle calendar sources
    Sources {
        #[command(subcommand)]
        action: Option<SourceActions>,
    },

    /// List events from enabled sources
    #[command(alias = "list")]
    Events,

    /// Show a month grid
    Month {
        /// Year to show (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month to show, 1-12 (defaults to the current month)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: Option<u32>,
    },

    /// Create an event
    #[command(alias = "create")]
    Add {
        /// Event title
        title: String,

        /// Start date/time, e.g. "2025-01-15 10:00"
        start: String,

        /// End date/time (defaults to one hour after start)
        #[arg(long)]
        end: Option<String>,

        /// Source id (defaults to the configured default source)
        #[arg(long)]
        source: Option<String>,

        /// Event description
        #[arg(long)]
        description: Option<String>,

        /// Mark as an all-day event
        #[arg(long)]
        all_day: bool,
    },

    /// Change fields of an existing event
    #[command(alias = "edit")]
    Update {
        /// Event id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        start: Option<String>,

        #[arg(long)]
        end: Option<String>,

        #[arg(long)]
        source: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        all_day: Option<bool>,
    },

    /// Delete an event
    #[command(alias = "rm")]
    Delete {
        /// Event id
        id: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SourceActions {
    /// List configured sources
    List,

    /// Enable or disable a source
    Toggle {
        /// Source id
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import() {
        let cli = Cli::parse_from(["unical", "import", "a.ics", "b.csv", "--source", "google"]);
        match cli.command {
            Commands::Import { files, source } => {
                assert_eq!(files, vec![PathBuf::from("a.ics"), PathBuf::from("b.csv")]);
                assert_eq!(source.as_deref(), Some("google"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_import_requires_files() {
        assert!(Cli::try_parse_from(["unical", "import"]).is_err());
    }

    #[test]
    fn test_month_range() {
        assert!(Cli::try_parse_from(["unical", "month", "--month", "13"]).is_err());
        assert!(Cli::try_parse_from(["unical", "month", "--month", "12", "--year", "2025"]).is_ok());
    }

    #[test]
    fn test_global_paths() {
        let cli = Cli::parse_from(["unical", "events", "--state-dir", "/tmp/x"]);
        assert_eq!(cli.state_dir, Some(PathBuf::from("/tmp/x")));
    }
}
