//! Date parsing helpers for calendar imports.
//
// ICS uses a compact timestamp; CSV and JSON go through a lenient parser that
// accepts the common textual shapes.

use crate::calendar::CalendarError;
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

static ICS_DATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{4})(\d{2})(\d{2})(?:T(\d{2})(\d{2})(\d{2})Z?)?$").expect("valid ICS date pattern")
});

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse an ICS `DTSTART`/`DTEND` value.
///
/// Accepts `YYYYMMDD` (local midnight) and `YYYYMMDDTHHMMSS` with an optional
/// trailing `Z`. The `Z` is not honoured: the fields are always read as local
/// time. Out-of-range fields are rejected.
pub fn parse_ics_date(value: &str) -> Result<DateTime<Local>, CalendarError> {
    let invalid = || CalendarError::InvalidDateTime(value.to_string());
    let caps = ICS_DATE.captures(value.trim()).ok_or_else(invalid)?;

    let field = |i: usize| -> u32 { caps.get(i).map_or(0, |m| m.as_str().parse().unwrap_or(0)) };
    let year: i32 = caps[1].parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(year, field(2), field(3)).ok_or_else(invalid)?;
    let time = NaiveTime::from_hms_opt(field(4), field(5), field(6)).ok_or_else(invalid)?;

    to_local(date.and_time(time)).ok_or_else(invalid)
}

/// Lenient date-time parsing for CSV cells and JSON strings.
///
/// Values with an explicit offset (RFC 3339, RFC 2822) are converted to local
/// time; everything else is read as local wall-clock time. Date-only values
/// land on local midnight.
pub fn parse_datetime(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Local));
    }

    for format in DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return to_local(naive);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).and_then(to_local);
        }
    }
    None
}

/// Milliseconds since the Unix epoch, as JSON numbers carry them.
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Local>> {
    Local.timestamp_millis_opt(millis).single()
}

// Nonexistent local times (DST gaps) fail; ambiguous ones take the earlier instant.
fn to_local(naive: NaiveDateTime) -> Option<DateTime<Local>> {
    Local.from_local_datetime(&naive).earliest()
}
