use crate::app::AppState;
use crate::calendar::{CalendarError, parse_datetime};
use crate::cli::{Cli, Commands, SourceActions};
use crate::config::Config;
use crate::state::StateManager;
use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use std::path::PathBuf;

pub mod events;
pub mod import;
pub mod month;
pub mod sources;

/// Config and event store a command works against
pub struct Workspace {
    pub config: Config,
    config_path: Option<PathBuf>,
    pub store: StateManager,
}

impl Workspace {
    pub fn open(config_path: Option<PathBuf>, state_dir: Option<PathBuf>) -> Result<Self> {
        let config = match &config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let store = match state_dir {
            Some(dir) => StateManager::with_dir(dir)?,
            None => StateManager::new()?,
        };
        Ok(Self { config, config_path, store })
    }

    pub fn save_config(&self) -> Result<()> {
        match &self.config_path {
            Some(path) => self.config.save_to(path),
            None => self.config.save(),
        }
    }

    pub fn app_state(&self, today: NaiveDate) -> Result<AppState> {
        let events = self.store.load_events().context("Failed to load stored events")?;
        Ok(AppState::new(today, self.config.sources.clone(), events))
    }

    /// The event list of `state` goes back to the store.
    pub fn save_state(&self, state: &AppState) -> Result<()> {
        self.store.save_events(&state.events).context("Failed to save events")
    }

    /// Source for new events: the requested id, else the configured default.
    pub fn default_source_id<'a>(&'a self, requested: Option<&'a str>) -> Option<&'a str> {
        requested.or(self.config.import.default_source.as_deref())
    }
}

pub(crate) fn parse_cli_datetime(value: &str) -> Result<DateTime<Local>, CalendarError> {
    parse_datetime(value).ok_or_else(|| CalendarError::InvalidDateTime(value.to_string()))
}

pub async fn execute(cli: Cli) -> Result<()> {
    let workspace = Workspace::open(cli.config, cli.state_dir)?;
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Import { files, source } => {
            import::import(&workspace, &files, source.as_deref()).await?;
        }
        Commands::Sources { action } => match action {
            None | Some(SourceActions::List) => sources::list_sources(&workspace),
            Some(SourceActions::Toggle { id }) => {
                let mut workspace = workspace;
                sources::toggle_source(&mut workspace, &id)?;
            }
        },
        Commands::Events => events::list_events(&workspace, today)?,
        Commands::Month { year, month } => month::show_month(&workspace, today, year, month)?,
        Commands::Add { title, start, end, source, description, all_day } => {
            let request = events::AddRequest { title, start, end, source, description, all_day };
            events::add_event(&workspace, today, request)?;
        }
        Commands::Update { id, title, start, end, source, description, all_day } => {
            let request = events::UpdateRequest { title, start, end, source, description, all_day };
            events::update_event(&workspace, today, &id, request)?;
        }
        Commands::Delete { id } => events::delete_event(&workspace, today, &id)?,
    }
    Ok(())
}
