use std::fmt;
use std::path::PathBuf;

use crate::error::{Error, Result};

pub const USERNAME_VAR: &str = "CRONOMETER_USERNAME";
pub const PASSWORD_VAR: &str = "CRONOMETER_PASSWORD";

/// Fixed run configuration. There are no command-line flags; everything
/// lives here.
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    /// Number of days to walk back from the start date, start included.
    pub days: u32,
    pub archive_dir: PathBuf,
    pub export_path: PathBuf,
    pub snapshot_dir: PathBuf,
    pub markup_dump: PathBuf,
    pub viewport: (u32, u32),
    pub headless: bool,
    pub timing: Timing,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "https://cronometer.com/".into(),
            days: 20,
            archive_dir: PathBuf::from("data"),
            export_path: PathBuf::from("data/all_servings.csv"),
            snapshot_dir: PathBuf::from("snapshots"),
            markup_dump: PathBuf::from("page.html"),
            viewport: (1080, 1600),
            headless: true,
            timing: Timing::default(),
        }
    }
}

/// Delays, timeouts and poll intervals, all in milliseconds.
#[derive(Debug, Clone)]
pub struct Timing {
    /// Pause after clicking the login link and after submitting the form.
    pub login_settle_ms: u64,
    /// Pause between a successful login and the first calendar interaction.
    pub post_login_ms: u64,
    pub element_timeout_ms: u64,
    pub element_poll_ms: u64,
    /// Bound on a single calendar step (toggle, year or month click) taking effect.
    pub step_timeout_ms: u64,
    pub step_poll_ms: u64,
    pub loading_timeout_ms: u64,
    pub loading_poll_ms: u64,
    pub day_retry_delay_ms: u64,
    /// Total day-cell clicks allowed before giving up.
    pub day_click_attempts: u32,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            login_settle_ms: 2000,
            post_login_ms: 1000,
            element_timeout_ms: 10_000,
            element_poll_ms: 200,
            step_timeout_ms: 5000,
            step_poll_ms: 50,
            loading_timeout_ms: 10_000,
            loading_poll_ms: 100,
            day_retry_delay_ms: 200,
            day_click_attempts: 10,
        }
    }
}

#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn from_env() -> Result<Self> {
        let read = |name: &'static str| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .ok_or(Error::MissingCredential(name))
        };
        Ok(Self {
            username: read(USERNAME_VAR)?,
            password: read(PASSWORD_VAR)?,
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
