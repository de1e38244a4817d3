use crate::browser::{ElementRef, InputEvent, PageDriver};
use crate::error::Result;
use crate::selectors::UPGRADE_MODAL_CLOSE;

/// Click an element the way a user would.
///
/// 1. Close the upgrade modal if it is covering the page
/// 2. Get the element's bounding box
/// 3. Move the pointer to its center and click there
pub async fn click<D: PageDriver + ?Sized>(driver: &D, element: ElementRef) -> Result<()> {
    if dismiss_upgrade_modal(driver).await? {
        tracing::info!("click: closed upgrade modal");
    }
    pointer_click(driver, element).await
}

/// Close the upgrade modal if present. Returns whether it was there.
pub async fn dismiss_upgrade_modal<D: PageDriver + ?Sized>(driver: &D) -> Result<bool> {
    match driver.query_element(UPGRADE_MODAL_CLOSE).await? {
        Some(close) => {
            pointer_click(driver, close).await?;
            Ok(true)
        }
        None => Ok(false),
    }
}

async fn pointer_click<D: PageDriver + ?Sized>(driver: &D, element: ElementRef) -> Result<()> {
    let (x, y) = driver.bounding_box(element).await?.center();
    driver.send_event(InputEvent::MouseMove { x, y }).await?;
    driver.send_event(InputEvent::Click { x, y }).await?;
    tracing::debug!("click [{}, {}]", x, y);
    Ok(())
}
