pub mod browser;
pub mod cache;
pub mod calendar;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod export;
pub mod interaction;
pub mod scraper;
pub mod selectors;
pub mod servings;

pub use error::{Error, Result};
