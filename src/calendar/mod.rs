//! Calendar data model and the ICS/CSV/JSON import pipeline.

mod calendar_csv;
mod calendar_dates;
mod calendar_grid;
mod calendar_ics;
mod calendar_import;
mod calendar_json;
mod calendar_types;

pub use calendar_csv::*;
pub use calendar_dates::*;
pub use calendar_grid::*;
pub use calendar_ics::*;
pub use calendar_import::*;
pub use calendar_json::*;
pub use calendar_types::*;

/// Upper bound on events taken from a single file
pub const MAX_EVENTS_PER_FILE: usize = 10_000;

/// Largest file the importer will read (10MB)
pub const MAX_IMPORT_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Custom error type for calendar operations
#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Calendar source '{0}' not found")]
    SourceNotFound(String),
    #[error("Event '{0}' not found")]
    EventNotFound(String),
    #[error("Invalid date/time format: {0}")]
    InvalidDateTime(String),
    #[error("No calendar sources are configured")]
    NoSources,
}

/// File-level import failures. The display text is what ends up in
/// [`FileImportResult::errors`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("Unsupported file format. Please use ICS, CSV or JSON files.")]
    UnsupportedFormat,
    #[error("Failed to read the file")]
    ReadFailed,
    #[error("File is too large to import (maximum {} bytes)", MAX_IMPORT_FILE_SIZE)]
    FileTooLarge,
    #[error("CSV file does not contain enough data")]
    CsvInsufficientData,
    #[error("Required columns (title, start time) were not found")]
    CsvMissingColumns,
    #[error("Failed to parse JSON file: {0}")]
    JsonSyntax(String),
    #[error("The \"events\" field must be an array")]
    JsonEventsNotArray,
    #[error("JSON file contains no event data (null document)")]
    JsonNullDocument,
    #[error("Too many events in file (maximum {}); the rest were skipped", MAX_EVENTS_PER_FILE)]
    TooManyEvents,
}
