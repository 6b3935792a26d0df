use crate::calendar::CalendarEvent;
use anyhow::{Result, anyhow};
use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

const STATE_DIR: &str = ".unical";
const EVENTS_FILE: &str = "events.json";
// Maximum allowed size for state files to prevent DoS attacks (10MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;
const MAX_ITEMS: usize = 10_000;

/// JSON file store for the event collection
pub struct StateManager {
    state_dir: PathBuf,
}

impl StateManager {
    pub fn new() -> Result<Self> {
        let home_dir = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
        Self::with_dir(home_dir.join(STATE_DIR))
    }

    pub fn with_dir(state_dir: impl Into<PathBuf>) -> Result<Self> {
        let state_dir = state_dir.into();
        std::fs::create_dir_all(&state_dir)?;
        Ok(Self { state_dir })
    }

    pub fn events_path(&self) -> PathBuf {
        self.state_dir.join(EVENTS_FILE)
    }

    pub fn load_events(&self) -> Result<Vec<CalendarEvent>> {
        load_json(&self.events_path())
    }

    /// Refuses collections the loader would reject, leaving the file untouched.
    pub fn save_events(&self, events: &[CalendarEvent]) -> Result<()> {
        check_item_count(events.len())?;
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(self.events_path())?;

        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, events)?;
        Ok(())
    }

    pub fn append_events(&self, new_events: &[CalendarEvent]) -> Result<()> {
        let mut events = self.load_events()?;
        check_item_count(events.len() + new_events.len())?;
        events.extend_from_slice(new_events);
        self.save_events(&events)
    }
}

fn load_json(path: &Path) -> Result<Vec<CalendarEvent>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    // Check file size before loading to prevent DoS attacks
    let metadata = std::fs::metadata(path)?;
    if metadata.len() > MAX_FILE_SIZE {
        return Err(anyhow!("File size exceeds security limits"));
    }

    let reader = BufReader::new(File::open(path)?);
    let json_value: serde_json::Value =
        serde_json::from_reader(reader).map_err(|e| anyhow!("Failed to parse JSON data: {}", e))?;

    if let Some(array) = json_value.as_array() {
        check_item_count(array.len())?;
    }

    serde_json::from_value(json_value).map_err(|e| anyhow!("Failed to deserialize data: {}", e))
}

fn check_item_count(count: usize) -> Result<()> {
    if count > MAX_ITEMS {
        return Err(anyhow!("Too many items in file (maximum {})", MAX_ITEMS));
    }
    Ok(())
}
