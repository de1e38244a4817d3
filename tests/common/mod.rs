//! In-memory stand-in for the Cronometer diary page.
//!
//! Elements sit on a horizontal strip, one 20px slot each, so the pointer
//! coordinates of a click identify the element it lands on. Like the real
//! page, an open upgrade modal swallows every click except its own close
//! button.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{Datelike, Month, NaiveDate};
use cronometer_scraper::browser::{ElementRef, ImageFormat, InputEvent, PageDriver, Rect, Script};
use cronometer_scraper::config::{Config, Credentials, Timing};
use cronometer_scraper::selectors::*;
use cronometer_scraper::{Error, Result};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum El {
    LoginLink,
    Email,
    Password,
    Submit,
    ModalClose,
    Toolbar(usize),
    Picker,
    PrevYear,
    PrevMonth,
    NextMonth,
    NextYear,
    ServingsPanel,
    Day(u32),
}

impl El {
    fn slot(self) -> u32 {
        match self {
            El::LoginLink => 0,
            El::Email => 1,
            El::Password => 2,
            El::Submit => 3,
            El::ModalClose => 4,
            El::Picker => 5,
            El::PrevYear => 6,
            El::PrevMonth => 7,
            El::NextMonth => 8,
            El::NextYear => 9,
            El::ServingsPanel => 10,
            El::Toolbar(i) => 20 + i as u32,
            El::Day(d) => 100 + d,
        }
    }

    fn from_slot(slot: u32) -> El {
        match slot {
            0 => El::LoginLink,
            1 => El::Email,
            2 => El::Password,
            3 => El::Submit,
            4 => El::ModalClose,
            5 => El::Picker,
            6 => El::PrevYear,
            7 => El::PrevMonth,
            8 => El::NextMonth,
            9 => El::NextYear,
            10 => El::ServingsPanel,
            s if (20..30).contains(&s) => El::Toolbar((s - 20) as usize),
            s if s > 100 => El::Day(s - 100),
            s => panic!("no element in slot {s}"),
        }
    }

    pub fn is_year_control(self) -> bool {
        matches!(self, El::PrevYear | El::NextYear)
    }

    pub fn is_month_control(self) -> bool {
        matches!(self, El::PrevMonth | El::NextMonth)
    }

    pub fn is_day(self) -> bool {
        matches!(self, El::Day(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    BoundingBox(El),
    Click(El),
    Focus(El),
    Keys(Option<El>, String),
    Render(String),
}

pub struct AppState {
    pub credentials: (String, String),
    pub logged_in: bool,
    pub login_form_open: bool,
    pub missing_login_fields: Vec<El>,
    pub missing_picker_controls: Vec<El>,
    pub help_widget: bool,
    pub modal_open: bool,
    pub picker_hidden: bool,
    /// Displayed (year, month).
    pub displayed: (i32, u32),
    pub selected: Option<NaiveDate>,
    /// Day clicks that the widget drops on the floor before one sticks.
    pub ignored_day_clicks: u32,
    pub hide_day_cells: bool,
    pub loading_polls_per_day: u32,
    pub loading_left: u32,
    pub stuck_loading: bool,
    pub servings: HashMap<NaiveDate, Vec<[&'static str; 3]>>,
    pub selections: Vec<NaiveDate>,
    pub focused: Option<El>,
    pub typed: HashMap<El, String>,
    pub actions: Vec<Action>,
    /// Calls to `release_elements`.
    pub releases: u32,
    /// Most handles ever live at once.
    pub peak_handles: usize,
    handles: Vec<El>,
}

pub struct FakeCronometer {
    state: Mutex<AppState>,
}

pub const USERNAME: &str = "me@example.com";
pub const PASSWORD: &str = "correct horse";

impl FakeCronometer {
    /// Logged-out landing page whose picker shows (and has selected) `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            state: Mutex::new(AppState {
                credentials: (USERNAME.into(), PASSWORD.into()),
                logged_in: false,
                login_form_open: false,
                missing_login_fields: Vec::new(),
                missing_picker_controls: Vec::new(),
                help_widget: true,
                modal_open: false,
                picker_hidden: true,
                displayed: (today.year(), today.month()),
                selected: Some(today),
                ignored_day_clicks: 0,
                hide_day_cells: false,
                loading_polls_per_day: 2,
                loading_left: 0,
                stuck_loading: false,
                servings: HashMap::new(),
                selections: Vec::new(),
                focused: None,
                typed: HashMap::new(),
                actions: Vec::new(),
                releases: 0,
                peak_handles: 0,
                handles: Vec::new(),
            }),
        }
    }

    /// Diary already open, picker showing `displayed`'s month.
    pub fn logged_in(displayed: NaiveDate) -> Self {
        Self::new(displayed).with(|s| s.logged_in = true)
    }

    pub fn with(self, f: impl FnOnce(&mut AppState)) -> Self {
        f(&mut self.state());
        self
    }

    pub fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().unwrap()
    }

    pub fn handle(&self, el: El) -> ElementRef {
        self.state().register(el)
    }

    pub fn clicks(&self) -> Vec<El> {
        self.state()
            .actions
            .iter()
            .filter_map(|a| match a {
                Action::Click(el) => Some(*el),
                _ => None,
            })
            .collect()
    }

    /// Clicks on the picker's year/month controls and day cells, in order.
    pub fn navigation_clicks(&self) -> Vec<El> {
        self.clicks()
            .into_iter()
            .filter(|el| el.is_year_control() || el.is_month_control() || el.is_day())
            .collect()
    }

    pub fn actions(&self) -> Vec<Action> {
        self.state().actions.clone()
    }

    pub fn selections(&self) -> Vec<NaiveDate> {
        self.state().selections.clone()
    }
}

impl AppState {
    fn register(&mut self, el: El) -> ElementRef {
        self.handles.push(el);
        self.peak_handles = self.peak_handles.max(self.handles.len());
        ElementRef((self.handles.len() - 1) as u64)
    }

    fn resolve(&self, element: ElementRef) -> Result<El> {
        self.handles
            .get(element.0 as usize)
            .copied()
            .ok_or(Error::StaleElement(element.0))
    }

    fn days_in_displayed_month(&self) -> u32 {
        let (y, m) = self.displayed;
        let next = if m == 12 {
            NaiveDate::from_ymd_opt(y + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(y, m + 1, 1)
        };
        next.and_then(|d| d.pred_opt()).map(|d| d.day()).unwrap()
    }

    fn find(&self, selector: &str) -> Option<El> {
        let login_field = |el: El| {
            (self.login_form_open && !self.missing_login_fields.contains(&el)).then_some(el)
        };
        let control =
            |el: El| (self.logged_in && !self.missing_picker_controls.contains(&el)).then_some(el);
        match selector {
            LOGIN_LINK => (!self.logged_in).then_some(El::LoginLink),
            LOGIN_EMAIL => login_field(El::Email),
            LOGIN_PASSWORD => login_field(El::Password),
            LOGIN_SUBMIT => login_field(El::Submit),
            UPGRADE_MODAL_CLOSE => self.modal_open.then_some(El::ModalClose),
            DATE_PICKER => self.logged_in.then_some(El::Picker),
            PICKER_PREV_YEAR => control(El::PrevYear),
            PICKER_PREV_MONTH => control(El::PrevMonth),
            PICKER_NEXT_MONTH => control(El::NextMonth),
            PICKER_NEXT_YEAR => control(El::NextYear),
            SERVINGS_PANEL => self.logged_in.then_some(El::ServingsPanel),
            _ => None,
        }
    }

    fn find_all(&self, selector: &str) -> Vec<El> {
        match selector {
            DATE_TOOLBAR_BUTTONS if self.logged_in => (0..3).map(El::Toolbar).collect(),
            DATE_TOOLBAR_BUTTONS => Vec::new(),
            PICKER_DAYS if self.hide_day_cells => Vec::new(),
            PICKER_DAYS => (1..=self.days_in_displayed_month()).map(El::Day).collect(),
            other => self.find(other).into_iter().collect(),
        }
    }

    fn click(&mut self, el: El) {
        self.actions.push(Action::Click(el));
        if self.modal_open && el != El::ModalClose {
            return;
        }
        match el {
            El::ModalClose => self.modal_open = false,
            El::LoginLink => self.login_form_open = true,
            El::Submit => {
                let user = self.typed.get(&El::Email).cloned().unwrap_or_default();
                let pass = self.typed.get(&El::Password).cloned().unwrap_or_default();
                if (user, pass) == self.credentials {
                    self.logged_in = true;
                    self.login_form_open = false;
                }
            }
            El::Toolbar(1) => self.picker_hidden = !self.picker_hidden,
            El::NextYear => self.displayed.0 += 1,
            El::PrevYear => self.displayed.0 -= 1,
            El::NextMonth => {
                self.displayed = match self.displayed {
                    (y, 12) => (y + 1, 1),
                    (y, m) => (y, m + 1),
                }
            }
            El::PrevMonth => {
                self.displayed = match self.displayed {
                    (y, 1) => (y - 1, 12),
                    (y, m) => (y, m - 1),
                }
            }
            El::Day(day) => {
                if self.ignored_day_clicks > 0 {
                    self.ignored_day_clicks -= 1;
                    return;
                }
                let (y, m) = self.displayed;
                let date = NaiveDate::from_ymd_opt(y, m, day).unwrap();
                self.selected = Some(date);
                self.selections.push(date);
                self.loading_left = self.loading_polls_per_day;
            }
            _ => {}
        }
    }

    fn calendar(&self) -> Value {
        let (y, m) = self.displayed;
        let month = Month::try_from(m as u8).unwrap();
        let day = self
            .selected
            .filter(|d| d.year() == y && d.month() == m)
            .map(|d| d.day().to_string());
        json!({ "label": format!("{} {}", month.name(), y), "day": day })
    }
}

#[async_trait]
impl PageDriver for FakeCronometer {
    async fn evaluate(&self, script: &Script, args: Vec<Value>) -> Result<Value> {
        let mut s = self.state();
        Ok(match script.name {
            "read_calendar" => s.calendar(),
            "find_day_cell" => {
                let day = args[1].as_u64().unwrap() as u32;
                if s.hide_day_cells || day == 0 || day > s.days_in_displayed_month() {
                    Value::Null
                } else {
                    json!(day - 1)
                }
            }
            "servings_loading" => {
                if s.stuck_loading {
                    json!(true)
                } else if s.loading_left > 0 {
                    s.loading_left -= 1;
                    json!(true)
                } else {
                    json!(false)
                }
            }
            "read_servings" => {
                let rows: Vec<Vec<&str>> = s
                    .selected
                    .and_then(|d| s.servings.get(&d))
                    .map(|rows| {
                        rows.iter()
                            .map(|[name, value, units]| vec!["", *name, *value, *units])
                            .collect()
                    })
                    .unwrap_or_default();
                json!(rows)
            }
            "remove_element" => {
                let removed = args[0] == json!(HELP_LAUNCHER) && s.help_widget;
                if removed {
                    s.help_widget = false;
                }
                json!(removed)
            }
            "body_markup" => json!("<div class=\"servingsPanel\"></div>"),
            other => return Err(Error::ElementNotFound(format!("script {other}"))),
        })
    }

    async fn send_event(&self, event: InputEvent) -> Result<()> {
        let mut s = self.state();
        match event {
            InputEvent::MouseMove { .. } => {}
            InputEvent::Click { x, .. } => {
                let slot = ((x - 5.0) / 20.0).round() as u32;
                s.click(El::from_slot(slot));
            }
            InputEvent::KeyPress(text) => {
                let focused = s.focused;
                if let Some(el) = focused {
                    s.typed.entry(el).or_default().push_str(&text);
                }
                s.actions.push(Action::Keys(focused, text));
            }
        }
        Ok(())
    }

    async fn query_element(&self, selector: &str) -> Result<Option<ElementRef>> {
        let mut s = self.state();
        Ok(s.find(selector).map(|el| s.register(el)))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>> {
        let mut s = self.state();
        let found = s.find_all(selector);
        Ok(found.into_iter().map(|el| s.register(el)).collect())
    }

    async fn get_attribute(&self, element: ElementRef, name: &str) -> Result<Option<String>> {
        let s = self.state();
        Ok(match (s.resolve(element)?, name) {
            (El::Picker, "aria-hidden") => Some(s.picker_hidden.to_string()),
            _ => None,
        })
    }

    async fn bounding_box(&self, element: ElementRef) -> Result<Rect> {
        let mut s = self.state();
        let el = s.resolve(element)?;
        s.actions.push(Action::BoundingBox(el));
        Ok(Rect {
            x: (el.slot() * 20) as f64,
            y: 0.0,
            width: 10.0,
            height: 10.0,
        })
    }

    async fn focus(&self, element: ElementRef) -> Result<()> {
        let mut s = self.state();
        let el = s.resolve(element)?;
        s.focused = Some(el);
        s.actions.push(Action::Focus(el));
        Ok(())
    }

    async fn release_elements(&self) -> Result<()> {
        let mut s = self.state();
        s.handles.clear();
        s.releases += 1;
        Ok(())
    }

    async fn render(&self, path: &Path, _format: ImageFormat) -> Result<()> {
        std::fs::write(path, b"\xff\xd8\xff")?;
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        self.state().actions.push(Action::Render(name));
        Ok(())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Timing with no settle delays and short, fast-polling waits.
pub fn fast_timing() -> Timing {
    Timing {
        login_settle_ms: 0,
        post_login_ms: 0,
        element_timeout_ms: 300,
        element_poll_ms: 1,
        step_timeout_ms: 300,
        step_poll_ms: 1,
        loading_timeout_ms: 300,
        loading_poll_ms: 1,
        day_retry_delay_ms: 1,
        day_click_attempts: 10,
    }
}

pub fn test_config(root: &Path, days: u32) -> Config {
    Config {
        days,
        archive_dir: root.join("data"),
        export_path: root.join("data").join("all_servings.csv"),
        snapshot_dir: root.join("snapshots"),
        markup_dump: root.join("page.html"),
        timing: fast_timing(),
        ..Config::default()
    }
}

pub fn credentials() -> Credentials {
    Credentials {
        username: USERNAME.into(),
        password: PASSWORD.into(),
    }
}

pub fn snapshot_names(root: &Path) -> Vec<String> {
    let dir: PathBuf = root.join("snapshots");
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
