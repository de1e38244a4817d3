use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::browser::{evaluate_as, scripts, PageDriver};
use crate::error::Result;
use crate::selectors::SERVINGS_ROWS;

/// One line of the diary's servings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serving {
    pub name: String,
    pub value: String,
    pub units: String,
    pub date: NaiveDate,
}

/// All servings logged on one day, in table order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyRecord {
    date: NaiveDate,
    servings: Vec<Serving>,
}

impl DailyRecord {
    /// Build a record, filing every serving under `date`.
    pub fn new(date: NaiveDate, servings: Vec<Serving>) -> Self {
        let servings = servings
            .into_iter()
            .map(|s| Serving { date, ..s })
            .collect();
        Self { date, servings }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn servings(&self) -> &[Serving] {
        &self.servings
    }

    pub fn len(&self) -> usize {
        self.servings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.servings.is_empty()
    }
}

/// Turn table rows (cell texts) into servings. The first cell is the row's
/// icon column; rows without name, amount and unit cells are placeholders.
pub fn parse_rows(rows: Vec<Vec<String>>, date: NaiveDate) -> Vec<Serving> {
    rows.into_iter()
        .filter_map(|cells| {
            let mut cells = cells.into_iter().skip(1);
            Some(Serving {
                name: cells.next()?,
                value: cells.next()?,
                units: cells.next()?,
                date,
            })
        })
        .collect()
}

/// Read the servings table currently on screen.
pub async fn read_servings<D: PageDriver + ?Sized>(driver: &D, date: NaiveDate) -> Result<DailyRecord> {
    let rows: Vec<Vec<String>> =
        evaluate_as(driver, &scripts::READ_SERVINGS, vec![SERVINGS_ROWS.into()]).await?;
    let total = rows.len();
    let servings = parse_rows(rows, date);
    if servings.len() < total {
        tracing::debug!("skipped {} placeholder row(s) for {}", total - servings.len(), date);
    }
    Ok(DailyRecord::new(date, servings))
}
