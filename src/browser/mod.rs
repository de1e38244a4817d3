pub mod chrome;
pub mod driver;
pub mod launcher;
pub mod registry;
pub mod scripts;
pub mod session;

pub use chrome::ChromeDriver;
pub use driver::{evaluate_as, ElementRef, ImageFormat, InputEvent, PageDriver, Rect, Script};
pub use session::BrowserSession;
