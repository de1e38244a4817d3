//! CSS selectors for the parts of the Cronometer diary the scraper touches.
//!
//! The `GL-*` class names are generated by GWT and change between releases of
//! the app; they are the first thing to check when a run fails to find
//! something.

pub const LOGIN_LINK: &str = "a[href*=login]";
pub const LOGIN_EMAIL: &str = "#login_user_form input[name=username]";
pub const LOGIN_PASSWORD: &str = "#login_user_form input[name=password]";
pub const LOGIN_SUBMIT: &str = "#login_user_form button[type=submit]";

/// Close button of the "upgrade to Gold" interstitial.
pub const UPGRADE_MODAL_CLOSE: &str = "button.GL-TVABCIDC";

/// Previous-day, calendar toggle and next-day buttons above the diary.
pub const DATE_TOOLBAR_BUTTONS: &str = ".GL-TVABCK5B";
pub const DATE_TOOLBAR_LEN: usize = 3;
pub const DATE_TOOLBAR_TOGGLE: usize = 1;

pub const DATE_PICKER: &str = ".gwt-DatePicker";
pub const PICKER_PREV_YEAR: &str = ".datePickerPreviousYearButton";
pub const PICKER_PREV_MONTH: &str = ".datePickerPreviousButton";
pub const PICKER_NEXT_MONTH: &str = ".datePickerNextButton";
pub const PICKER_NEXT_YEAR: &str = ".datePickerNextYearButton";
pub const PICKER_MONTH_LABEL: &str = ".datePickerMonth";
pub const PICKER_SELECTED_DAY: &str = ".datePickerDay.datePickerDayIsValue";
/// Day cells of the displayed month; filler cells belong to adjacent months.
pub const PICKER_DAYS: &str = ".datePickerDay:not(.datePickerDayIsFiller)";

pub const SERVINGS_PANEL: &str = ".servingsPanel";
pub const SERVINGS_LOADING_ROW: &str = ".servingsPanel tr:nth-child(2)";
pub const SERVINGS_ROWS: &str = ".servingsPanel tr:not(.prettyTable-header)";

/// Floating "Help" launcher that overlaps the diary.
pub const HELP_LAUNCHER: &str = "#launcher";
