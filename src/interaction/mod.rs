pub mod click;
pub mod keyboard;
pub mod wait;

pub use click::{click, dismiss_upgrade_modal};
pub use keyboard::type_text;
pub use wait::{wait_for_selector, wait_until};
