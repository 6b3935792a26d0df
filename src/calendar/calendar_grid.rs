//! Month grid layout for the calendar module.

use crate::calendar::CalendarEvent;
use chrono::{Datelike, Days, NaiveDate};

/// Six weeks, so every month fits
pub const GRID_DAYS: u64 = 42;

/// One cell of the month grid
#[derive(Debug, Clone, PartialEq)]
pub struct CalendarDay {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<CalendarEvent>,
}

pub(crate) fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.day0()))
}

/// Lay out the month containing `month` as 42 days starting on the Sunday on
/// or before the 1st. Each day holds the events that start on it.
pub fn month_grid(month: NaiveDate, today: NaiveDate, events: &[CalendarEvent]) -> Vec<CalendarDay> {
    let first = first_of_month(month);
    let start = first - Days::new(u64::from(first.weekday().num_days_from_sunday()));

    (0..GRID_DAYS)
        .map(|offset| {
            let date = start + Days::new(offset);
            CalendarDay {
                date,
                is_current_month: date.month() == first.month(),
                is_today: date == today,
                events: events
                    .iter()
                    .filter(|event| event.start_date.date_naive() == date)
                    .cloned()
                    .collect(),
            }
        })
        .collect()
}
