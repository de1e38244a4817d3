//! Day-keyed archive of scraped servings.
//!
//! Each scraped day is persisted as `YYYY-MM-DD_servings.json` in the archive
//! directory. The presence of that file is the only thing that marks a day as
//! done, so a run that dies halfway keeps every day it finished.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Error, Result};
use crate::export::{format_date, format_date_value, parse_date_value, write_json};
use crate::servings::{DailyRecord, Serving};

const ARCHIVE_SUFFIX: &str = "_servings.json";

fn archive_name() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{4}-\d{2}-\d{2})_servings\.json$").expect("valid regex"))
}

/// Archive row as found on disk. The date is kept raw: archives written by
/// older exporters carry full timestamps.
#[derive(Debug, Deserialize)]
struct ArchivedServing {
    name: String,
    value: String,
    units: String,
    #[serde(default)]
    date: serde_json::Value,
}

pub struct ScrapeCache {
    dir: PathBuf,
    records: BTreeMap<NaiveDate, DailyRecord>,
}

impl ScrapeCache {
    /// Index every archive in `dir`, creating the directory if needed.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;

        let mut records = BTreeMap::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(date) = file_name.to_str().and_then(archive_date) else {
                continue;
            };
            let record = read_archive(&entry.path(), date)?;
            tracing::debug!("loaded {} serving(s) for {}", record.len(), date);
            records.insert(date, record);
        }

        tracing::info!("{} archived day(s) in {}", records.len(), dir.display());
        Ok(Self { dir, records })
    }

    pub fn has(&self, date: NaiveDate) -> bool {
        self.records.contains_key(&date)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyRecord> {
        self.records.get(&date)
    }

    /// Persist `record` and add it to the index. Archived days are final.
    pub fn put(&mut self, record: DailyRecord) -> Result<()> {
        let date = record.date();
        if self.has(date) {
            return Err(Error::AlreadyArchived(date));
        }
        write_json(&self.path_for(date), record.servings())?;
        self.records.insert(date, record);
        Ok(())
    }

    pub fn path_for(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("{}{}", format_date(&date), ARCHIVE_SUFFIX))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn archive_date(file_name: &str) -> Option<NaiveDate> {
    let caps = archive_name().captures(file_name)?;
    NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()
}

fn read_archive(path: &Path, date: NaiveDate) -> Result<DailyRecord> {
    let text = std::fs::read_to_string(path)?;
    let rows: Vec<ArchivedServing> = serde_json::from_str(&text)?;
    let servings = rows
        .into_iter()
        .map(|row| {
            if parse_date_value(&row.date) != Some(date) {
                tracing::warn!(
                    "{}: serving {:?} dated {}, filing under {}",
                    path.display(),
                    row.name,
                    format_date_value(&row.date),
                    date
                );
            }
            Serving {
                name: row.name,
                value: row.value,
                units: row.units,
                date,
            }
        })
        .collect();
    Ok(DailyRecord::new(date, servings))
}
