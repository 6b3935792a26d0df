use crate::app::{AppState, EventUpdate, NewEvent};
use crate::calendar::{CalendarError, CalendarEvent, CalendarSource};
use crate::commands::{Workspace, parse_cli_datetime};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use log::{debug, info};

#[derive(Debug, Clone)]
pub struct AddRequest {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub all_day: bool,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateRequest {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub all_day: Option<bool>,
}

pub fn list_events(workspace: &Workspace, today: NaiveDate) -> Result<()> {
    let state = workspace.app_state(today)?;
    let mut events = state.visible_events();
    events.sort_by_key(|e| e.start_date);

    println!("Calendar Events:");
    if events.is_empty() {
        println!("  No events found.");
    }
    for event in &events {
        println!("{}", format_event(event));
    }
    Ok(())
}

pub fn format_event(event: &CalendarEvent) -> String {
    let mut output = format!("  - {} [{}]\n", event.title, event.id);
    output.push_str(&format!("    Date: {}\n", event.start_date.format("%Y-%m-%d")));
    output.push_str(&format!("    Time: {}\n", event.time_display()));
    output.push_str(&format!("    Calendar: {}", event.source.name));
    if !event.description.is_empty() {
        output.push_str(&format!("\n    Description: {}", event.description));
    }
    output
}

fn find_source(state: &AppState, source_id: &str) -> Result<CalendarSource, CalendarError> {
    state
        .find_source(source_id)
        .cloned()
        .ok_or_else(|| CalendarError::SourceNotFound(source_id.to_string()))
}

pub fn add_event(workspace: &Workspace, today: NaiveDate, request: AddRequest) -> Result<()> {
    let state = workspace.app_state(today)?;

    let source = match workspace.default_source_id(request.source.as_deref()) {
        Some(id) => find_source(&state, id)?,
        None => state.sources.first().cloned().ok_or(CalendarError::NoSources)?,
    };
    let start_date = parse_cli_datetime(&request.start)?;
    let end_date = match &request.end {
        Some(end) => parse_cli_datetime(end)?,
        None => start_date + Duration::hours(1),
    };
    debug!("Adding '{}' to '{}'", request.title, source.id);

    let state = state.create_event(NewEvent {
        title: request.title,
        description: request.description.unwrap_or_default(),
        start_date,
        end_date,
        source,
        all_day: request.all_day,
    });
    workspace.save_state(&state)?;

    if let Some(event) = state.events.last() {
        info!("Created event {}", event.id);
        println!("Created event:\n{}", format_event(event));
    }
    Ok(())
}

pub fn update_event(workspace: &Workspace, today: NaiveDate, id: &str, request: UpdateRequest) -> Result<()> {
    let state = workspace.app_state(today)?;
    if state.find_event(id).is_none() {
        return Err(CalendarError::EventNotFound(id.to_string()).into());
    }

    let update = EventUpdate {
        title: request.title,
        description: request.description,
        start_date: request.start.as_deref().map(parse_cli_datetime).transpose()?,
        end_date: request.end.as_deref().map(parse_cli_datetime).transpose()?,
        source: request.source.as_deref().map(|s| find_source(&state, s)).transpose()?,
        all_day: request.all_day,
    };

    let state = state.update_event(id, update);
    workspace.save_state(&state)?;

    if let Some(event) = state.find_event(id) {
        println!("Updated event:\n{}", format_event(event));
    }
    Ok(())
}

pub fn delete_event(workspace: &Workspace, today: NaiveDate, id: &str) -> Result<()> {
    let state = workspace.app_state(today)?;
    let Some(event) = state.find_event(id) else {
        return Err(CalendarError::EventNotFound(id.to_string()).into());
    };
    println!("Deleted event '{}'", event.title);

    let state = state.delete_event(id);
    workspace.save_state(&state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SourceKind;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_format_event() {
        let source = CalendarSource::new("google", "Google Calendar", SourceKind::Google, "#EA4335");
        let start = Local.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        let event = CalendarEvent::new("Team sync", "Weekly", start, start + Duration::hours(1), &source);

        let output = format_event(&event);
        assert!(output.starts_with("  - Team sync ["));
        assert!(output.contains("Date: 2025-01-15"));
        assert!(output.contains("Time: 10:00 - 11:00"));
        assert!(output.contains("Calendar: Google Calendar"));
        assert!(output.ends_with("Description: Weekly"));
    }
}
