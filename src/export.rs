use std::io::Write;
use std::path::Path;

use chrono::{DateTime, Datelike, NaiveDate};

use crate::error::Result;
use crate::servings::Serving;

pub const CSV_HEADER: &str = "Date,Name,Value,Units";

/// `YYYY-MM-DD` with zero-padded month and day.
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// Interpret an archived date field: either a plain ISO date or a full
/// RFC 3339 timestamp.
pub fn parse_date_value(value: &serde_json::Value) -> Option<NaiveDate> {
    let text = value.as_str()?;
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(text).ok().map(|dt| dt.date_naive()))
}

/// Format an arbitrary JSON value as a date, falling back to its literal JSON
/// text when it is not one.
pub fn format_date_value(value: &serde_json::Value) -> String {
    match parse_date_value(value) {
        Some(date) => format_date(&date),
        None => {
            tracing::warn!("[format_date] not a date: {}", value);
            value.to_string()
        }
    }
}

fn quote(field: &str) -> String {
    // JSON string quoting; infallible for &str.
    serde_json::Value::from(field).to_string()
}

/// Render servings as CSV: fixed header, one row per serving, every field
/// quoted. Lines are joined with `\n` and there is no trailing newline.
pub fn to_csv(servings: &[Serving]) -> String {
    let mut lines = Vec::with_capacity(servings.len() + 1);
    lines.push(CSV_HEADER.to_string());
    for s in servings {
        let date = format_date(&s.date);
        let fields: [&str; 4] = [&date, &s.name, &s.value, &s.units];
        lines.push(fields.map(quote).join(","));
    }
    lines.join("\n")
}

pub fn write_csv(path: &Path, servings: &[Serving]) -> Result<()> {
    write_atomic(path, to_csv(servings).as_bytes())
}

/// Pretty-printed JSON array, the per-day archive format.
pub fn write_json(path: &Path, servings: &[Serving]) -> Result<()> {
    write_atomic(path, serde_json::to_string_pretty(servings)?.as_bytes())
}

/// Write through a temp file in the same directory so a crash never leaves a
/// half-written file under `path`.
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
