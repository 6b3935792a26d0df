//! Core data types for the calendar module.
//
// Sources, events, per-record import outcomes and per-file import results.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Provider kind of a calendar source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Google,
    Outlook,
    Apple,
    Local,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Google => write!(f, "google"),
            SourceKind::Outlook => write!(f, "outlook"),
            SourceKind::Apple => write!(f, "apple"),
            SourceKind::Local => write!(f, "local"),
        }
    }
}

/// A calendar that events belong to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SourceKind,
    pub color: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl CalendarSource {
    pub fn new(id: &str, name: &str, kind: SourceKind, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            color: color.to_string(),
            enabled: true,
        }
    }
}

/// A single calendar event.
///
/// `source` and `color` are copies taken when the event is created, so later
/// edits to the source do not change events that already exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub start_date: DateTime<Local>,
    pub end_date: DateTime<Local>,
    pub source: CalendarSource,
    pub color: String,
    #[serde(default)]
    pub all_day: bool,
}

impl CalendarEvent {
    /// Build an event stamped with `source`, using a fresh id.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        start_date: DateTime<Local>,
        end_date: DateTime<Local>,
        source: &CalendarSource,
    ) -> Self {
        Self {
            id: generate_event_id(),
            title: title.into(),
            description: description.into(),
            start_date,
            end_date,
            source: source.clone(),
            color: source.color.clone(),
            all_day: false,
        }
    }

    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    pub fn time_display(&self) -> String {
        if self.all_day {
            "All day".to_string()
        } else {
            format!("{} - {}", self.start_date.format("%H:%M"), self.end_date.format("%H:%M"))
        }
    }
}

/// Millisecond timestamp followed by a short random suffix.
///
/// Collisions are unlikely, not impossible.
pub fn generate_event_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// What happened to one record (VEVENT block, CSV row, JSON object) during import
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    Imported(CalendarEvent),
    /// Incomplete record, dropped without a diagnostic
    Skipped,
    /// Malformed record, reported to the user
    Failed(String),
}

/// Result of importing one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileImportResult {
    pub success: bool,
    pub events: Vec<CalendarEvent>,
    pub errors: Vec<String>,
    pub file_name: String,
}

impl FileImportResult {
    /// A structural failure: no events and exactly one error.
    pub fn failure(file_name: &str, error: impl fmt::Display) -> Self {
        Self {
            success: false,
            events: Vec::new(),
            errors: vec![error.to_string()],
            file_name: file_name.to_string(),
        }
    }

    /// Fold per-record outcomes into a file result. Succeeds iff at least one
    /// record was imported.
    pub fn from_outcomes<I>(file_name: &str, outcomes: I) -> Self
    where
        I: IntoIterator<Item = RecordOutcome>,
    {
        let mut events = Vec::new();
        let mut errors = Vec::new();
        for outcome in outcomes {
            match outcome {
                RecordOutcome::Imported(event) => events.push(event),
                RecordOutcome::Skipped => {}
                RecordOutcome::Failed(message) => errors.push(message),
            }
        }
        Self { success: !events.is_empty(), events, errors, file_name: file_name.to_string() }
    }

    /// Append a file-level diagnostic without touching the collected events.
    pub fn push_error(&mut self, error: impl fmt::Display) {
        self.errors.push(error.to_string());
    }
}
