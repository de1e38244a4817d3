//! Session controller: owns the page for the whole run, logs in, walks the
//! day window and exports the result.

mod login;

use std::time::Duration;

use chrono::NaiveDate;

pub use login::login;

use crate::browser::PageDriver;
use crate::cache::ScrapeCache;
use crate::calendar::CalendarNavigator;
use crate::config::{Config, Credentials};
use crate::diagnostics::Diagnostics;
use crate::error::Result;
use crate::export::{format_date, write_csv};
use crate::servings::{read_servings, DailyRecord, Serving};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub days: u32,
    pub cached: u32,
    pub scraped: u32,
    pub servings: usize,
}

/// `days` consecutive dates counting back from `start`, `start` first.
pub fn day_window(start: NaiveDate, days: u32) -> impl Iterator<Item = NaiveDate> {
    std::iter::successors(Some(start), |d| d.pred_opt()).take(days as usize)
}

pub struct Scraper<D: PageDriver> {
    driver: D,
    cache: ScrapeCache,
    diagnostics: Diagnostics,
    config: Config,
    logged_in: bool,
}

impl<D: PageDriver> Scraper<D> {
    pub fn new(driver: D, cache: ScrapeCache, config: Config) -> Self {
        Self {
            driver,
            cache,
            diagnostics: Diagnostics::new(&config.snapshot_dir),
            config,
            logged_in: false,
        }
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn cache(&self) -> &ScrapeCache {
        &self.cache
    }

    pub fn is_logged_in(&self) -> bool {
        self.logged_in
    }

    /// Log in, collect the day window ending at `start` and write the
    /// aggregate CSV. On failure, leaves a screenshot and a markup dump behind
    /// before returning the error.
    pub async fn run(&mut self, credentials: &Credentials, start: NaiveDate) -> Result<RunSummary> {
        match self.run_window(credentials, start).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                tracing::error!("An error occurred: {}", e);
                self.capture_failure().await;
                Err(e)
            }
        }
    }

    async fn run_window(&mut self, credentials: &Credentials, start: NaiveDate) -> Result<RunSummary> {
        login(&self.driver, credentials, &self.config.timing).await?;
        self.logged_in = true;
        tokio::time::sleep(Duration::from_millis(self.config.timing.post_login_ms)).await;

        let mut all_servings: Vec<Serving> = Vec::new();
        let mut summary = RunSummary::default();

        for date in day_window(start, self.config.days) {
            summary.days += 1;
            tracing::info!("Scraping data for {}", date);

            if let Some(record) = self.cache.get(date) {
                tracing::info!("Using saved data for {}", date);
                all_servings.extend_from_slice(record.servings());
                summary.cached += 1;
                continue;
            }

            let record = self.scrape_day(date).await?;
            all_servings.extend_from_slice(record.servings());
            self.cache.put(record)?;
            summary.scraped += 1;
        }

        write_csv(&self.config.export_path, &all_servings)?;
        summary.servings = all_servings.len();
        tracing::info!(
            "Exported {} serving(s) over {} day(s) ({} cached, {} scraped) to {}",
            summary.servings,
            summary.days,
            summary.cached,
            summary.scraped,
            self.config.export_path.display()
        );
        Ok(summary)
    }

    async fn scrape_day(&mut self, date: NaiveDate) -> Result<DailyRecord> {
        CalendarNavigator::new(&self.driver, &self.config.timing)
            .select_date(date)
            .await?;
        self.diagnostics
            .snapshot(&self.driver, &format_date(&date))
            .await?;

        tracing::info!("Parsing servings for {}", date);
        read_servings(&self.driver, date).await
    }

    /// Best effort: the run is already failing, so problems here are only logged.
    async fn capture_failure(&mut self) {
        if let Err(e) = self.diagnostics.snapshot(&self.driver, "error").await {
            tracing::warn!("Failed to take error snapshot: {}", e);
        }
        if let Err(e) = self
            .diagnostics
            .dump_markup(&self.driver, &self.config.markup_dump)
            .await
        {
            tracing::warn!("Failed to dump page markup: {}", e);
        }
    }
}
