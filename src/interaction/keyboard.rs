use crate::browser::{ElementRef, InputEvent, PageDriver};
use crate::error::Result;

/// Type text into an element by focusing it and sending key presses.
///
/// Unlike setting `value` from script, this goes through the browser's input
/// pipeline so the app's own key handlers see every character.
pub async fn type_text<D: PageDriver + ?Sized>(
    driver: &D,
    element: ElementRef,
    text: &str,
) -> Result<()> {
    driver.focus(element).await?;
    driver.send_event(InputEvent::KeyPress(text.to_string())).await
}
