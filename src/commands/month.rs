use crate::app::AppState;
use crate::calendar::{CalendarDay, CalendarError};
use crate::commands::Workspace;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};

pub fn show_month(workspace: &Workspace, today: NaiveDate, year: Option<i32>, month: Option<u32>) -> Result<()> {
    let year = year.unwrap_or_else(|| today.year());
    let month = month.unwrap_or_else(|| today.month());
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| CalendarError::InvalidDateTime(format!("{}-{:02}", year, month)))?;

    let state = workspace.app_state(today)?.show_month(first);
    print!("{}", render_month(&state, today));
    Ok(())
}

/// Month grid with an event count per day, followed by the month's events.
pub fn render_month(state: &AppState, today: NaiveDate) -> String {
    let days = state.calendar_days(today);
    let mut output = format!("{}\n", state.current_month.format("%B %Y"));
    output.push_str(" Sun   Mon   Tue   Wed   Thu   Fri   Sat\n");

    for week in days.chunks(7) {
        let cells: Vec<String> = week.iter().map(render_cell).collect();
        output.push_str(cells.join("").trim_end());
        output.push('\n');
    }

    let month_events: Vec<_> = days.iter().filter(|d| d.is_current_month).flat_map(|d| d.events.iter()).collect();
    if !month_events.is_empty() {
        output.push('\n');
        for event in month_events {
            output.push_str(&format!(
                "{} {} {}\n",
                event.start_date.format("%m-%d"),
                event.time_display(),
                event.title
            ));
        }
    }
    output
}

// Six characters per cell: day number, today marker, event count.
fn render_cell(day: &CalendarDay) -> String {
    if !day.is_current_month {
        return "   .  ".to_string();
    }
    let marker = if day.is_today { '*' } else { ' ' };
    let count = match day.events.len() {
        0 => "  ".to_string(),
        n if n < 10 => format!("+{}", n),
        _ => "+9".to_string(),
    };
    format!("{:>3}{}{}", day.date.day(), marker, count)
}
