use crate::calendar::{CalendarSource, SourceKind};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default = "default_sources")]
    pub sources: Vec<CalendarSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ImportConfig {
    /// Source used when `--source` is not given
    pub default_source: Option<String>,
}

fn default_sources() -> Vec<CalendarSource> {
    vec![
        CalendarSource::new("google", "Google Calendar", SourceKind::Google, "#EA4335"),
        CalendarSource::new("outlook", "Outlook Calendar", SourceKind::Outlook, "#0078D4"),
        CalendarSource::new("apple", "Apple Calendar", SourceKind::Apple, "#8E8E93"),
        CalendarSource::new("local", "Local Calendar", SourceKind::Local, "#10B981"),
    ]
}

impl Default for Config {
    fn default() -> Self {
        Self {
            import: ImportConfig { default_source: Some("local".to_string()) },
            sources: default_sources(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&get_config_path()?)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&get_config_path()?)
    }

    /// Load from `path`, writing the defaults there first if it does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let default_config = Config::default();
            default_config.save_to(path)?;
            return Ok(default_config);
        }

        let content = fs::read_to_string(path).context("Failed to read config file")?;
        toml::from_str(&content).context("Failed to parse config file")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).context("Failed to write config file")?;

        Ok(())
    }
}

fn get_config_path() -> Result<PathBuf> {
    let proj_dirs =
        ProjectDirs::from("com", "unical", "unical").context("Failed to determine config directory")?;

    Ok(proj_dirs.config_dir().join("config.toml"))
}
