//! Drives the diary's GWT date picker to an arbitrary day.
//!
//! The picker only offers one-step controls (previous/next month and year)
//! and reacts asynchronously, so navigation is a sequence of single clicks,
//! each followed by a re-read of the widget. Year is always settled before
//! month: clicking the two kinds of control is not known to commute.

pub mod state;

use std::time::Duration;

use chrono::{Datelike, NaiveDate};

use crate::browser::{evaluate_as, scripts, ElementRef, PageDriver};
use crate::config::Timing;
use crate::error::{Error, Result};
use crate::interaction::{click, dismiss_upgrade_modal, wait_for_selector, wait_until};
use crate::selectors::*;

pub use state::{read_calendar, CalendarState};

struct PickerControls {
    prev_year: ElementRef,
    prev_month: ElementRef,
    next_month: ElementRef,
    next_year: ElementRef,
}

/// Result of one click on a day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayClick {
    Selected,
    Mismatch(CalendarState),
}

pub struct CalendarNavigator<'a, D: PageDriver + ?Sized> {
    driver: &'a D,
    timing: &'a Timing,
}

impl<'a, D: PageDriver + ?Sized> CalendarNavigator<'a, D> {
    pub fn new(driver: &'a D, timing: &'a Timing) -> Self {
        Self { driver, timing }
    }

    /// Select `target` in the picker and wait for its servings to load.
    pub async fn select_date(&self, target: NaiveDate) -> Result<()> {
        // Handles from the previous day are never reused.
        self.driver.release_elements().await?;
        dismiss_upgrade_modal(self.driver).await?;
        self.open_picker().await?;
        let controls = self.controls().await?;

        let mut shown = read_calendar(self.driver).await?;
        while target.year() > shown.year {
            tracing::info!("[nextYear] year: {}, selectedYear: {}", target.year(), shown.year);
            shown = self.step(controls.next_year, shown).await?;
        }
        while target.year() < shown.year {
            tracing::info!("[prevYear] year: {}, selectedYear: {}", target.year(), shown.year);
            shown = self.step(controls.prev_year, shown).await?;
        }
        while target.month() > shown.month {
            tracing::info!("[nextMonth] month: {}, selectedMonth: {}", target.month(), shown.month);
            shown = self.step(controls.next_month, shown).await?;
        }
        while target.month() < shown.month {
            tracing::info!("[prevMonth] month: {}, selectedMonth: {}", target.month(), shown.month);
            shown = self.step(controls.prev_month, shown).await?;
        }

        let cell = self.find_day_cell(target).await?;
        self.select_day(cell, target).await?;
        self.wait_for_servings().await
    }

    async fn open_picker(&self) -> Result<()> {
        let toolbar = self.driver.query_all(DATE_TOOLBAR_BUTTONS).await?;
        if toolbar.len() != DATE_TOOLBAR_LEN {
            return Err(Error::ElementNotFound(format!(
                "{} (expected {} date buttons, found {})",
                DATE_TOOLBAR_BUTTONS,
                DATE_TOOLBAR_LEN,
                toolbar.len()
            )));
        }

        wait_for_selector(
            self.driver,
            DATE_PICKER,
            self.timing.element_timeout_ms,
            self.timing.element_poll_ms,
        )
        .await?;
        let picker = self
            .driver
            .query_element(DATE_PICKER)
            .await?
            .ok_or_else(|| Error::ElementNotFound(DATE_PICKER.to_string()))?;

        if self.is_hidden(picker).await? {
            tracing::info!("opening date picker");
            click(self.driver, toolbar[DATE_TOOLBAR_TOGGLE]).await?;
            wait_until(
                || async move { self.is_hidden(picker).await.map(|hidden| !hidden) },
                self.timing.step_timeout_ms,
                self.timing.step_poll_ms,
                "date picker to open",
            )
            .await?;
        }
        Ok(())
    }

    async fn is_hidden(&self, picker: ElementRef) -> Result<bool> {
        let hidden = self.driver.get_attribute(picker, "aria-hidden").await?;
        Ok(hidden.as_deref() == Some("true"))
    }

    async fn controls(&self) -> Result<PickerControls> {
        let prev_year = self.driver.query_element(PICKER_PREV_YEAR).await?;
        let prev_month = self.driver.query_element(PICKER_PREV_MONTH).await?;
        let next_month = self.driver.query_element(PICKER_NEXT_MONTH).await?;
        let next_year = self.driver.query_element(PICKER_NEXT_YEAR).await?;

        let missing: Vec<&str> = [
            (prev_year, PICKER_PREV_YEAR),
            (prev_month, PICKER_PREV_MONTH),
            (next_month, PICKER_NEXT_MONTH),
            (next_year, PICKER_NEXT_YEAR),
        ]
        .into_iter()
        .filter(|(found, _)| found.is_none())
        .map(|(_, selector)| selector)
        .collect();

        match (prev_year, prev_month, next_month, next_year) {
            (Some(prev_year), Some(prev_month), Some(next_month), Some(next_year)) => {
                Ok(PickerControls {
                    prev_year,
                    prev_month,
                    next_month,
                    next_year,
                })
            }
            _ => Err(Error::ElementNotFound(missing.join(", "))),
        }
    }

    /// Click one month/year control and wait for the displayed page to move.
    async fn step(&self, control: ElementRef, before: CalendarState) -> Result<CalendarState> {
        click(self.driver, control).await?;
        let driver = self.driver;
        wait_until(
            || async move { read_calendar(driver).await.map(|now| !now.same_page(&before)) },
            self.timing.step_timeout_ms,
            self.timing.step_poll_ms,
            &format!("date picker to leave {}", before),
        )
        .await?;
        read_calendar(self.driver).await
    }

    async fn find_day_cell(&self, target: NaiveDate) -> Result<ElementRef> {
        let index: Option<usize> = evaluate_as(
            self.driver,
            &scripts::FIND_DAY_CELL,
            vec![PICKER_DAYS.into(), target.day().into()],
        )
        .await?;

        let cells = self.driver.query_all(PICKER_DAYS).await?;
        index
            .and_then(|i| cells.get(i).copied())
            .ok_or_else(|| Error::DateSelection {
                date: target,
                reason: format!("unable to locate day {}", target.day()),
            })
    }

    /// Click the day cell until the picker reports it selected, within the
    /// configured number of attempts.
    async fn select_day(&self, cell: ElementRef, target: NaiveDate) -> Result<()> {
        let attempts = self.timing.day_click_attempts;
        for attempt in 1..=attempts {
            if attempt > 1 {
                tokio::time::sleep(Duration::from_millis(self.timing.day_retry_delay_ms)).await;
            }
            match self.click_day(cell, target).await? {
                DayClick::Selected => {
                    tracing::info!("selected {} (attempt {})", target, attempt);
                    return Ok(());
                }
                DayClick::Mismatch(shown) => {
                    tracing::warn!(
                        "day click {}/{}: wanted {}, picker shows {}",
                        attempt,
                        attempts,
                        target,
                        shown
                    );
                }
            }
        }
        Err(Error::DateSelection {
            date: target,
            reason: format!("selection did not stick after {} clicks", attempts),
        })
    }

    pub async fn click_day(&self, cell: ElementRef, target: NaiveDate) -> Result<DayClick> {
        click(self.driver, cell).await?;
        let shown = read_calendar(self.driver).await?;
        Ok(if shown.is_selected(target) {
            DayClick::Selected
        } else {
            DayClick::Mismatch(shown)
        })
    }

    async fn wait_for_servings(&self) -> Result<()> {
        let driver = self.driver;
        wait_until(
            || async move {
                evaluate_as::<bool, _>(
                    driver,
                    &scripts::SERVINGS_LOADING,
                    vec![SERVINGS_LOADING_ROW.into()],
                )
                .await
                .map(|loading| !loading)
            },
            self.timing.loading_timeout_ms,
            self.timing.loading_poll_ms,
            "servings panel to finish loading",
        )
        .await
    }
}
