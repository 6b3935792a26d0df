use crate::calendar::{
    CalendarDay, CalendarEvent, CalendarSource, first_of_month, generate_event_id, month_grid,
};
use chrono::{DateTime, Local, Months, NaiveDate};
use log::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthDirection {
    Prev,
    Next,
}

/// Fields for a new event. The id and color are filled in on creation.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Local>,
    pub end_date: DateTime<Local>,
    pub source: CalendarSource,
    pub all_day: bool,
}

/// Partial update; `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<DateTime<Local>>,
    pub end_date: Option<DateTime<Local>>,
    pub source: Option<CalendarSource>,
    pub all_day: Option<bool>,
}

/// Everything the calendar view shows. Transitions take the state by value
/// and return the next one.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    /// First day of the displayed month
    pub current_month: NaiveDate,
    pub sources: Vec<CalendarSource>,
    pub events: Vec<CalendarEvent>,
}

impl AppState {
    pub fn new(today: NaiveDate, sources: Vec<CalendarSource>, events: Vec<CalendarEvent>) -> Self {
        Self { current_month: first_of_month(today), sources, events }
    }

    pub fn navigate_month(mut self, direction: MonthDirection) -> Self {
        let next = match direction {
            MonthDirection::Prev => self.current_month.checked_sub_months(Months::new(1)),
            MonthDirection::Next => self.current_month.checked_add_months(Months::new(1)),
        };
        if let Some(month) = next {
            self.current_month = month;
        }
        self
    }

    pub fn show_month(mut self, month: NaiveDate) -> Self {
        self.current_month = first_of_month(month);
        self
    }

    pub fn toggle_source(mut self, source_id: &str) -> Self {
        for source in self.sources.iter_mut().filter(|s| s.id == source_id) {
            source.enabled = !source.enabled;
            debug!("Source '{}' enabled: {}", source.id, source.enabled);
        }
        self
    }

    pub fn create_event(mut self, new_event: NewEvent) -> Self {
        self.events.push(CalendarEvent {
            id: generate_event_id(),
            title: new_event.title,
            description: new_event.description,
            start_date: new_event.start_date,
            end_date: new_event.end_date,
            color: new_event.source.color.clone(),
            source: new_event.source,
            all_day: new_event.all_day,
        });
        self
    }

    /// Unknown ids leave the state unchanged.
    pub fn update_event(mut self, event_id: &str, update: EventUpdate) -> Self {
        if let Some(event) = self.events.iter_mut().find(|e| e.id == event_id) {
            if let Some(title) = update.title {
                event.title = title;
            }
            if let Some(description) = update.description {
                event.description = description;
            }
            if let Some(start_date) = update.start_date {
                event.start_date = start_date;
            }
            if let Some(end_date) = update.end_date {
                event.end_date = end_date;
            }
            if let Some(source) = update.source {
                event.color = source.color.clone();
                event.source = source;
            }
            if let Some(all_day) = update.all_day {
                event.all_day = all_day;
            }
        }
        self
    }

    pub fn delete_event(mut self, event_id: &str) -> Self {
        self.events.retain(|e| e.id != event_id);
        self
    }

    /// Append a batch of imported events as they are.
    pub fn import_events(mut self, events: Vec<CalendarEvent>) -> Self {
        self.events.extend(events);
        self
    }

    pub fn find_event(&self, event_id: &str) -> Option<&CalendarEvent> {
        self.events.iter().find(|e| e.id == event_id)
    }

    pub fn find_source(&self, source_id: &str) -> Option<&CalendarSource> {
        self.sources.iter().find(|s| s.id == source_id)
    }

    /// Events whose source is enabled. Events from sources that are no longer
    /// configured are hidden too.
    pub fn visible_events(&self) -> Vec<CalendarEvent> {
        self.events
            .iter()
            .filter(|event| self.sources.iter().any(|s| s.enabled && s.id == event.source.id))
            .cloned()
            .collect()
    }

    pub fn calendar_days(&self, today: NaiveDate) -> Vec<CalendarDay> {
        month_grid(self.current_month, today, &self.visible_events())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::SourceKind;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sources() -> Vec<CalendarSource> {
        vec![
            CalendarSource::new("google", "Google Calendar", SourceKind::Google, "#EA4335"),
            CalendarSource::new("apple", "Apple Calendar", SourceKind::Apple, "#8E8E93"),
        ]
    }

    fn new_event(title: &str, source: &CalendarSource) -> NewEvent {
        let start = Local.with_ymd_and_hms(2025, 1, 15, 10, 0, 0).unwrap();
        NewEvent {
            title: title.to_string(),
            description: String::new(),
            start_date: start,
            end_date: start,
            source: source.clone(),
            all_day: false,
        }
    }

    fn state() -> AppState {
        let sources = sources();
        AppState::new(date(2025, 1, 31), sources.clone(), Vec::new())
            .create_event(new_event("Standup", &sources[0]))
            .create_event(new_event("Dinner", &sources[1]))
    }

    #[test]
    fn test_navigate_month_wraps_years() {
        let state = AppState::new(date(2025, 1, 31), sources(), Vec::new());
        assert_eq!(state.current_month, date(2025, 1, 1));

        let state = state.navigate_month(MonthDirection::Prev);
        assert_eq!(state.current_month, date(2024, 12, 1));

        let state = state.navigate_month(MonthDirection::Next).navigate_month(MonthDirection::Next);
        assert_eq!(state.current_month, date(2025, 2, 1));
    }

    #[test]
    fn test_toggle_source_hides_events() {
        let state = state();
        assert_eq!(state.visible_events().len(), 2);

        let state = state.toggle_source("apple");
        let visible = state.visible_events();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Standup");

        let state = state.toggle_source("apple");
        assert_eq!(state.visible_events().len(), 2);
    }

    #[test]
    fn test_create_event_copies_color() {
        let state = state();
        assert_eq!(state.events[1].color, "#8E8E93");
        assert_ne!(state.events[0].id, state.events[1].id);
    }

    #[test]
    fn test_update_event() {
        let state = state();
        let id = state.events[0].id.clone();
        let other = sources()[1].clone();

        let state = state.update_event(
            &id,
            EventUpdate { title: Some("Sync".to_string()), source: Some(other), ..Default::default() },
        );
        let event = state.find_event(&id).unwrap();
        assert_eq!(event.title, "Sync");
        assert_eq!(event.source.id, "apple");
        assert_eq!(event.color, "#8E8E93");
    }

    #[test]
    fn test_unknown_ids_leave_state_unchanged() {
        let state = state();
        let before = state.clone();

        let state = state
            .update_event("nope", EventUpdate { title: Some("x".to_string()), ..Default::default() })
            .delete_event("nope")
            .toggle_source("nope");
        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_and_import() {
        let state = state();
        let id = state.events[0].id.clone();
        let imported = state.events.clone();

        let state = state.delete_event(&id).import_events(imported);
        assert_eq!(state.events.len(), 3);
        assert_eq!(state.events.iter().filter(|e| e.id == id).count(), 1);
    }

    #[test]
    fn test_calendar_days_only_show_visible_events() {
        let state = state().toggle_source("google");
        let days = state.calendar_days(date(2025, 1, 15));

        let day = days.iter().find(|d| d.date == date(2025, 1, 15)).unwrap();
        assert!(day.is_today);
        assert_eq!(day.events.len(), 1);
        assert_eq!(day.events[0].title, "Dinner");
    }
}
