use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

use crate::browser::{evaluate_as, scripts, PageDriver};
use crate::error::{Error, Result};
use crate::selectors::{PICKER_MONTH_LABEL, PICKER_SELECTED_DAY};

/// What the date picker currently shows. An observation, never a source of
/// truth: re-read it after every interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarState {
    pub year: i32,
    /// 1-based.
    pub month: u32,
    /// Highlighted day, if the selected date is in the displayed month.
    pub day: Option<u32>,
}

impl CalendarState {
    /// Parse the month label (`"October 2026"`) and the highlighted day cell.
    pub fn parse(label: &str, day: Option<&str>) -> Result<Self> {
        let label = label.split_whitespace().collect::<Vec<_>>().join(" ");
        let first = NaiveDate::parse_from_str(&format!("1 {}", label), "%d %B %Y")
            .map_err(|_| Error::CalendarLabel(label.clone()))?;
        Ok(Self {
            year: first.year(),
            month: first.month(),
            day: day.and_then(|d| d.trim().parse().ok()),
        })
    }

    pub fn is_selected(&self, date: NaiveDate) -> bool {
        self.year == date.year() && self.month == date.month() && self.day == Some(date.day())
    }

    fn page_key(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn same_page(&self, other: &CalendarState) -> bool {
        self.page_key() == other.page_key()
    }
}

impl std::fmt::Display for CalendarState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.day {
            Some(day) => write!(f, "{:04}-{:02}-{:02}", self.year, self.month, day),
            None => write!(f, "{:04}-{:02}", self.year, self.month),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    label: Option<String>,
    day: Option<String>,
}

/// Read the picker's displayed month and highlighted day from the page.
pub async fn read_calendar<D: PageDriver + ?Sized>(driver: &D) -> Result<CalendarState> {
    let raw: RawCalendar = evaluate_as(
        driver,
        &scripts::READ_CALENDAR,
        vec![PICKER_MONTH_LABEL.into(), PICKER_SELECTED_DAY.into()],
    )
    .await?;
    let label = raw
        .label
        .ok_or_else(|| Error::ElementNotFound(PICKER_MONTH_LABEL.to_string()))?;
    let state = CalendarState::parse(&label, raw.day.as_deref())?;
    tracing::debug!("calendar shows {}", state);
    Ok(state)
}
