use std::path::Path;

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams,
    DispatchMouseEventType, MouseButton,
};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::cdp::js_protocol::runtime::ReleaseObjectParams;
use chromiumoxide::page::{Page, ScreenshotParams};
use tokio::sync::Mutex;

use super::driver::{ElementRef, ImageFormat, InputEvent, PageDriver, Rect, Script};
use super::registry::ElementTable;
use crate::error::{Error, Result};

/// [`PageDriver`] over a chromiumoxide page.
pub struct ChromeDriver {
    page: Page,
    elements: Mutex<ElementTable>,
}

impl ChromeDriver {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            elements: Mutex::new(ElementTable::new()),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    async fn dispatch_mouse(&self, kind: DispatchMouseEventType, x: f64, y: f64) -> Result<()> {
        let is_move = matches!(kind, DispatchMouseEventType::MouseMoved);
        let mut builder = DispatchMouseEventParams::builder().r#type(kind).x(x).y(y);
        if !is_move {
            builder = builder.button(MouseButton::Left).click_count(1);
        }
        let params = builder.build().map_err(Error::Input)?;
        self.page.execute(params).await?;
        Ok(())
    }

    async fn dispatch_char(&self, ch: char) -> Result<()> {
        let params = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::Char)
            .text(ch.to_string())
            .build()
            .map_err(Error::Input)?;
        self.page.execute(params).await?;
        Ok(())
    }
}

#[async_trait]
impl PageDriver for ChromeDriver {
    async fn evaluate(
        &self,
        script: &Script,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let expression = script.invocation(&args)?;
        // Always an expression; `evaluate` would guess from the text.
        let result = self.page.evaluate_expression(expression).await?;
        // `undefined` has no JSON form; treat it as null.
        Ok(result.into_value().unwrap_or(serde_json::Value::Null))
    }

    async fn send_event(&self, event: InputEvent) -> Result<()> {
        match event {
            InputEvent::MouseMove { x, y } => {
                self.dispatch_mouse(DispatchMouseEventType::MouseMoved, x, y).await
            }
            InputEvent::Click { x, y } => {
                self.dispatch_mouse(DispatchMouseEventType::MousePressed, x, y).await?;
                self.dispatch_mouse(DispatchMouseEventType::MouseReleased, x, y).await
            }
            InputEvent::KeyPress(text) => {
                for ch in text.chars() {
                    self.dispatch_char(ch).await?;
                }
                Ok(())
            }
        }
    }

    async fn query_element(&self, selector: &str) -> Result<Option<ElementRef>> {
        // find_element errors on a miss without saying so; an empty
        // querySelectorAll is unambiguous.
        let found = self.page.find_elements(selector).await?;
        let mut elements = self.elements.lock().await;
        Ok(found.into_iter().next().map(|el| elements.insert(el)))
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>> {
        let found = self.page.find_elements(selector).await?;
        let mut elements = self.elements.lock().await;
        let refs: Vec<ElementRef> = found.into_iter().map(|el| elements.insert(el)).collect();
        tracing::debug!(
            "{} matched {} element(s), {} tracked",
            selector,
            refs.len(),
            elements.len()
        );
        Ok(refs)
    }

    async fn get_attribute(&self, element: ElementRef, name: &str) -> Result<Option<String>> {
        let elements = self.elements.lock().await;
        Ok(elements.get(element)?.attribute(name).await?)
    }

    async fn bounding_box(&self, element: ElementRef) -> Result<Rect> {
        let elements = self.elements.lock().await;
        let bbox = elements.get(element)?.bounding_box().await?;
        Ok(Rect {
            x: bbox.x,
            y: bbox.y,
            width: bbox.width,
            height: bbox.height,
        })
    }

    async fn focus(&self, element: ElementRef) -> Result<()> {
        let elements = self.elements.lock().await;
        elements.get(element)?.focus().await?;
        Ok(())
    }

    async fn release_elements(&self) -> Result<()> {
        let released = self.elements.lock().await.drain();
        let count = released.len();
        for element in released {
            let params = ReleaseObjectParams::new(element.remote_object_id.clone());
            if let Err(e) = self.page.execute(params).await {
                // The node may already be gone from the page.
                tracing::debug!("release of remote object failed: {}", e);
            }
        }
        tracing::debug!("released {} element handle(s)", count);
        Ok(())
    }

    async fn render(&self, path: &Path, format: ImageFormat) -> Result<()> {
        let format = match format {
            ImageFormat::Jpeg => CaptureScreenshotFormat::Jpeg,
            ImageFormat::Png => CaptureScreenshotFormat::Png,
        };
        self.page
            .save_screenshot(ScreenshotParams::builder().format(format).build(), path)
            .await?;
        Ok(())
    }
}
