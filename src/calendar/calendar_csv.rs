//! CSV import for the calendar module.
//
// Column roles come from the header text, not from column position. Rows are
// split naively on commas: quoted fields cannot contain commas.

use crate::calendar::{
    CalendarEvent, CalendarSource, FileImportResult, ImportError, MAX_EVENTS_PER_FILE,
    RecordOutcome, parse_datetime,
};
use chrono::Duration;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, warn};

const CSV_FILE_NAME: &str = "CSV File";

const TITLE_HEADERS: &[&str] = &["title", "subject", "summary"];
const START_HEADERS: &[&str] = &["start"];
const END_HEADERS: &[&str] = &["end"];
const DESCRIPTION_HEADERS: &[&str] = &["description", "desc"];

/// Which column holds which field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub title: usize,
    pub start: usize,
    pub end: Option<usize>,
    pub description: Option<usize>,
}

impl ColumnMap {
    /// Infer column roles by substring match on lower-cased headers. The first
    /// matching header wins. Title and start are required.
    pub fn from_headers<'a, I>(headers: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<String> = headers.into_iter().map(|h| h.trim().to_lowercase()).collect();
        let find = |keys: &[&str]| headers.iter().position(|h| keys.iter().any(|k| h.contains(k)));

        Some(Self {
            title: find(TITLE_HEADERS)?,
            start: find(START_HEADERS)?,
            end: find(END_HEADERS),
            description: find(DESCRIPTION_HEADERS),
        })
    }

    fn required_width(&self) -> usize {
        self.title.max(self.start) + 1
    }
}

fn strip_quotes(cell: &str) -> &str {
    let cell = cell.strip_prefix('"').unwrap_or(cell);
    cell.strip_suffix('"').unwrap_or(cell)
}

/// Parse CSV text into events stamped with `source`.
///
/// A bad row is reported with its line number (the header is line 1) and
/// does not stop the rows after it.
pub fn parse_csv(content: &str, source: &CalendarSource) -> FileImportResult {
    let lines: Vec<&str> = content.split('\n').map(str::trim).filter(|l| !l.is_empty()).collect();
    if lines.len() < 2 {
        return FileImportResult::failure(CSV_FILE_NAME, ImportError::CsvInsufficientData);
    }

    let data = lines.join("\n");
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .quoting(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(data.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => ColumnMap::from_headers(headers.iter()),
        Err(e) => {
            warn!("Could not read CSV header: {}", e);
            None
        }
    };
    let Some(columns) = columns else {
        return FileImportResult::failure(CSV_FILE_NAME, ImportError::CsvMissingColumns);
    };
    debug!("CSV columns: {:?}", columns);

    let mut outcomes = Vec::new();
    let mut imported = 0usize;
    let mut truncated = false;

    for (index, record) in reader.records().enumerate() {
        let row_number = index + 2;
        let outcome = match record {
            Ok(record) => parse_row(&record, &columns, row_number, source),
            Err(e) => RecordOutcome::Failed(format!("Row {}: {}", row_number, e)),
        };
        if let RecordOutcome::Imported(_) = outcome {
            if imported == MAX_EVENTS_PER_FILE {
                truncated = true;
                break;
            }
            imported += 1;
        }
        outcomes.push(outcome);
    }

    let mut result = FileImportResult::from_outcomes(CSV_FILE_NAME, outcomes);
    if truncated {
        warn!("CSV import truncated at {} events", MAX_EVENTS_PER_FILE);
        result.push_error(ImportError::TooManyEvents);
    }
    result
}

fn parse_row(
    record: &StringRecord,
    columns: &ColumnMap,
    row_number: usize,
    source: &CalendarSource,
) -> RecordOutcome {
    let cells: Vec<&str> = record.iter().map(strip_quotes).collect();
    if cells.len() < columns.required_width() {
        return RecordOutcome::Failed(format!(
            "Row {}: expected at least {} columns, found {}",
            row_number,
            columns.required_width(),
            cells.len()
        ));
    }

    let title = cells[columns.title];
    if title.is_empty() {
        return RecordOutcome::Skipped;
    }

    let start_cell = cells[columns.start];
    let Some(start) = parse_datetime(start_cell) else {
        return RecordOutcome::Failed(format!("Row {}: invalid start date '{}'", row_number, start_cell));
    };

    // An empty or missing end cell falls back to a one hour event.
    let end = match columns.end.and_then(|i| cells.get(i)).filter(|cell| !cell.is_empty()) {
        Some(end_cell) => match parse_datetime(end_cell) {
            Some(end) => end,
            None => {
                return RecordOutcome::Failed(format!(
                    "Row {}: invalid end date '{}'",
                    row_number, end_cell
                ));
            }
        },
        None => start + Duration::hours(1),
    };

    let description = columns.description.and_then(|i| cells.get(i)).copied().unwrap_or("");

    RecordOutcome::Imported(CalendarEvent::new(title, description, start, end, source))
}
