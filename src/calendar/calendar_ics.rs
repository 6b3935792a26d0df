//! ICS import for the calendar module.
//
// A line-oriented scan over VEVENT blocks. Only SUMMARY, DESCRIPTION, DTSTART
// and DTEND are read; every other property line is ignored.

use crate::calendar::{
    CalendarEvent, CalendarSource, FileImportResult, ImportError, MAX_EVENTS_PER_FILE,
    RecordOutcome, parse_ics_date,
};
use chrono::{DateTime, Local};
use log::{debug, warn};

const ICS_FILE_NAME: &str = "ICS File";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    OutsideEvent,
    InsideEvent,
}

/// Fields collected between BEGIN:VEVENT and END:VEVENT
#[derive(Debug, Default)]
struct PendingEvent {
    title: Option<String>,
    description: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
}

impl PendingEvent {
    fn apply(&mut self, line: &str) {
        if let Some(title) = line.strip_prefix("SUMMARY:") {
            self.title = Some(title.to_string());
        } else if let Some(description) = line.strip_prefix("DESCRIPTION:") {
            self.description = Some(description.to_string());
        } else if let Some(value) = line.strip_prefix("DTSTART:") {
            self.start = parse_property_date("DTSTART", value);
        } else if let Some(value) = line.strip_prefix("DTEND:") {
            self.end = parse_property_date("DTEND", value);
        }
    }

    /// Blocks without a title or either date are dropped silently.
    fn finish(self, source: &CalendarSource) -> RecordOutcome {
        match (self.title, self.start, self.end) {
            (Some(title), Some(start), Some(end)) if !title.is_empty() => RecordOutcome::Imported(
                CalendarEvent::new(title, self.description.unwrap_or_default(), start, end, source),
            ),
            _ => RecordOutcome::Skipped,
        }
    }
}

fn parse_property_date(property: &str, value: &str) -> Option<DateTime<Local>> {
    match parse_ics_date(value) {
        Ok(date) => Some(date),
        Err(e) => {
            debug!("Ignoring {} value: {}", property, e);
            None
        }
    }
}

/// Parse ICS text into events stamped with `source`.
///
/// Succeeds iff at least one VEVENT block produced an event. Incomplete blocks
/// leave no diagnostic.
pub fn parse_ics(content: &str, source: &CalendarSource) -> FileImportResult {
    let mut outcomes = Vec::new();
    let scanned = scan_events(content, source, &mut outcomes);

    let mut result = FileImportResult::from_outcomes(ICS_FILE_NAME, outcomes);
    if let Err(e) = scanned {
        warn!("ICS scan stopped early: {}", e);
        result.push_error(e);
    }
    result
}

fn scan_events(
    content: &str,
    source: &CalendarSource,
    outcomes: &mut Vec<RecordOutcome>,
) -> Result<(), ImportError> {
    let mut state = ScanState::OutsideEvent;
    let mut pending = PendingEvent::default();
    let mut imported = 0usize;

    for line in content.split('\n').map(str::trim) {
        match (state, line) {
            (_, "BEGIN:VEVENT") => {
                state = ScanState::InsideEvent;
                pending = PendingEvent::default();
            }
            (ScanState::InsideEvent, "END:VEVENT") => {
                state = ScanState::OutsideEvent;
                let outcome = std::mem::take(&mut pending).finish(source);
                if let RecordOutcome::Imported(_) = outcome {
                    if imported == MAX_EVENTS_PER_FILE {
                        return Err(ImportError::TooManyEvents);
                    }
                    imported += 1;
                }
                outcomes.push(outcome);
            }
            (ScanState::InsideEvent, _) => pending.apply(line),
            (ScanState::OutsideEvent, _) => {}
        }
    }

    debug!("ICS scan finished with {} event(s)", imported);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SourceKind;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn source() -> CalendarSource {
        CalendarSource::new("apple", "Apple Calendar", SourceKind::Apple, "#8E8E93")
    }

    #[test]
    fn test_minimal_block() {
        let content = "BEGIN:VEVENT\nSUMMARY:Test\nDTSTART:20250115T100000\nDTEND:20250115T110000\nEND:VEVENT";
        let result = parse_ics(content, &source());

        assert!(result.success);
        assert!(result.errors.is_empty());
        assert_eq!(result.events.len(), 1);
        let event = &result.events[0];
        assert_eq!(event.title, "Test");
        assert_eq!(event.description, "");
        assert_eq!(event.start_date, Local.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap());
        assert_eq!(event.end_date, Local.with_ymd_and_hms(2025, 1, 15, 11, 0, 0).unwrap());
        assert_eq!(event.color, "#8E8E93");
        assert!(!event.all_day);
    }

    #[test]
    fn test_calendar_wrapper_crlf_and_unknown_properties() {
        let content = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nBEGIN:VEVENT\r\nUID:abc@example.com\r\n  SUMMARY:Review  \r\nLOCATION:Room 4\r\nDESCRIPTION:Quarterly numbers\r\nRRULE:FREQ=WEEKLY\r\nDTSTART:20250120\r\nDTEND:20250121\r\nEND:VEVENT\r\nEND:VCALENDAR\r\n";
        let result = parse_ics(content, &source());

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].title, "Review");
        assert_eq!(result.events[0].description, "Quarterly numbers");
        assert_eq!(result.events[0].start_date, Local.with_ymd_and_hms(2025, 1, 20, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_block_without_summary_is_dropped_silently() {
        let content = "BEGIN:VEVENT\nDTSTART:20250115T100000\nDTEND:20250115T110000\nEND:VEVENT\n";
        let result = parse_ics(content, &source());

        assert!(!result.success);
        assert!(result.events.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_block_with_invalid_date_is_dropped_silently() {
        let content = "BEGIN:VEVENT\nSUMMARY:Broken\nDTSTART:20251301T100000\nDTEND:20251301T110000\nEND:VEVENT\nBEGIN:VEVENT\nSUMMARY:Fine\nDTSTART:20250201T100000\nDTEND:20250201T110000\nEND:VEVENT\n";
        let result = parse_ics(content, &source());

        assert!(result.success);
        assert!(result.errors.is_empty());
        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].title, "Fine");
    }

    #[test]
    fn test_stray_end_and_lines_outside_blocks_are_ignored() {
        let content = "END:VEVENT\nSUMMARY:Outside\nBEGIN:VEVENT\nSUMMARY:Inside\nDTSTART:20250115T100000\nDTEND:20250115T110000\nEND:VEVENT\nEND:VEVENT\n";
        let result = parse_ics(content, &source());

        assert_eq!(result.events.len(), 1);
        assert_eq!(result.events[0].title, "Inside");
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_nested_begin_restarts_block() {
        let content = "BEGIN:VEVENT\nSUMMARY:Lost\nBEGIN:VEVENT\nDTSTART:20250115T100000\nDTEND:20250115T110000\nEND:VEVENT\n";
        let result = parse_ics(content, &source());

        assert!(!result.success);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_summary_is_not_unescaped() {
        let content = "BEGIN:VEVENT\nSUMMARY:Lunch\\, team\nDTSTART:20250115T120000\nDTEND:20250115T130000\nEND:VEVENT";
        let result = parse_ics(content, &source());

        assert_eq!(result.events[0].title, "Lunch\\, team");
    }

    #[test]
    fn test_multiple_blocks_get_unique_ids() {
        let block = "BEGIN:VEVENT\nSUMMARY:Repeat\nDTSTART:20250115T100000\nDTEND:20250115T110000\nEND:VEVENT\n";
        let result = parse_ics(&block.repeat(5), &source());

        assert_eq!(result.events.len(), 5);
        let ids: std::collections::HashSet<_> = result.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), 5);
    }
}
