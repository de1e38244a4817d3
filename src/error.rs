use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A selector the workflow depends on resolved to nothing.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A polled condition never became true.
    #[error("Timed out after {timeout_ms}ms waiting for {description}")]
    Timeout { description: String, timeout_ms: u64 },

    /// The date picker could not be driven to the requested day.
    #[error("Unable to select date {date}: {reason}")]
    DateSelection { date: NaiveDate, reason: String },

    #[error("Could not find login form (missing: {})", .0.join(", "))]
    LoginForm(Vec<&'static str>),

    #[error("Unreadable calendar label: {0:?}")]
    CalendarLabel(String),

    #[error("Servings for {0} are already archived")]
    AlreadyArchived(NaiveDate),

    #[error("Missing environment variable {0}")]
    MissingCredential(&'static str),

    #[error("Stale element reference #{0}")]
    StaleElement(u64),

    #[error("Input event rejected: {0}")]
    Input(String),

    #[error("CDP error: {0}")]
    Browser(#[from] chromiumoxide::error::CdpError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
