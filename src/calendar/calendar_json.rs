//! JSON import for the calendar module.
//
// Accepts a top-level array of event objects or an object with an `events`
// array. Each logical field may be spelled several ways; the key tables below
// list the spellings in priority order.

use crate::calendar::{
    CalendarEvent, CalendarSource, FileImportResult, ImportError, MAX_EVENTS_PER_FILE,
    RecordOutcome, from_epoch_millis, parse_datetime,
};
use chrono::{DateTime, Local};
use log::{debug, warn};
use serde_json::{Map, Value};

const JSON_FILE_NAME: &str = "JSON File";

const TITLE_KEYS: &[&str] = &["title", "summary"];
const DESCRIPTION_KEYS: &[&str] = &["description"];
const START_KEYS: &[&str] = &["startDate", "start"];
// Without an end the event collapses onto its start.
const END_KEYS: &[&str] = &["endDate", "end", "startDate", "start"];
const ALL_DAY_KEYS: &[&str] = &["allDay"];

/// First value under `keys` that is set. Null, false, zero and empty strings
/// count as unset, so the next spelling gets a chance.
fn resolve<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().filter_map(|key| record.get(*key)).find(|value| is_set(value))
}

fn is_set(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(_) | Value::Bool(_) => Some(value.to_string()),
        _ => None,
    }
}

fn value_date(value: &Value) -> Option<DateTime<Local>> {
    match value {
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)).and_then(from_epoch_millis),
        _ => None,
    }
}

/// Parse JSON text into events stamped with `source`.
///
/// Invalid JSON is a file-level failure. A valid document without records is
/// an unsuccessful import with no errors.
pub fn parse_json(content: &str, source: &CalendarSource) -> FileImportResult {
    let root: Value = match serde_json::from_str(content) {
        Ok(root) => root,
        Err(e) => {
            warn!("Invalid JSON import: {}", e);
            return FileImportResult::failure(JSON_FILE_NAME, ImportError::JsonSyntax(e.to_string()));
        }
    };

    let records: &[Value] = match &root {
        Value::Array(records) => records.as_slice(),
        Value::Object(object) => match object.get("events") {
            Some(Value::Array(records)) => records.as_slice(),
            Some(Value::Null) | None => &[],
            Some(_) => return FileImportResult::failure(JSON_FILE_NAME, ImportError::JsonEventsNotArray),
        },
        Value::Null => return FileImportResult::failure(JSON_FILE_NAME, ImportError::JsonNullDocument),
        _ => &[],
    };
    debug!("JSON document holds {} record(s)", records.len());

    let mut outcomes = Vec::with_capacity(records.len());
    let mut imported = 0usize;
    let mut truncated = false;

    for (index, record) in records.iter().enumerate() {
        let outcome = parse_record(record, index + 1, source);
        if let RecordOutcome::Imported(_) = outcome {
            if imported == MAX_EVENTS_PER_FILE {
                truncated = true;
                break;
            }
            imported += 1;
        }
        outcomes.push(outcome);
    }

    let mut result = FileImportResult::from_outcomes(JSON_FILE_NAME, outcomes);
    if truncated {
        warn!("JSON import truncated at {} events", MAX_EVENTS_PER_FILE);
        result.push_error(ImportError::TooManyEvents);
    }
    result
}

fn parse_record(record: &Value, number: usize, source: &CalendarSource) -> RecordOutcome {
    let Some(record) = record.as_object() else {
        return RecordOutcome::Failed(format!("Event #{}: expected an object", number));
    };

    let Some(title) = resolve(record, TITLE_KEYS) else {
        return RecordOutcome::Skipped;
    };
    let Some(title) = value_text(title) else {
        return RecordOutcome::Failed(format!("Event #{}: title must be text", number));
    };

    let description = resolve(record, DESCRIPTION_KEYS).and_then(value_text).unwrap_or_default();

    let Some(start_value) = resolve(record, START_KEYS) else {
        return RecordOutcome::Failed(format!("Event #{}: missing start date", number));
    };
    let Some(start) = value_date(start_value) else {
        return RecordOutcome::Failed(format!("Event #{}: invalid start date {}", number, start_value));
    };

    let end = match resolve(record, END_KEYS) {
        Some(end_value) => match value_date(end_value) {
            Some(end) => end,
            None => {
                return RecordOutcome::Failed(format!("Event #{}: invalid end date {}", number, end_value));
            }
        },
        None => start,
    };

    let all_day = resolve(record, ALL_DAY_KEYS).is_some();

    RecordOutcome::Imported(CalendarEvent::new(title, description, start, end, source).with_all_day(all_day))
}
