use std::path::Path;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Opaque handle to an element held by a [`PageDriver`].
///
/// The handle only means something to the driver that issued it; page-side
/// objects never cross the evaluation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(pub u64);

/// A named function evaluated inside the page.
///
/// `source` must be a JS function expression; it is called with the JSON
/// arguments spread into it and its return value is copied back as JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    pub name: &'static str,
    pub source: &'static str,
}

impl Script {
    /// The expression that applies `source` to `args`.
    pub fn invocation(&self, args: &[serde_json::Value]) -> Result<String> {
        Ok(format!("({})(...{})", self.source, serde_json::to_string(args)?))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    MouseMove { x: f64, y: f64 },
    Click { x: f64, y: f64 },
    /// Key presses for every character of the text, sent to the focused element.
    KeyPress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Jpeg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

/// Everything the scraper needs from a live page.
///
/// Clicking is deliberately absent: callers go through
/// [`crate::interaction::click::click`], which handles the upgrade modal
/// before dispatching pointer events.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn evaluate(&self, script: &Script, args: Vec<serde_json::Value>)
        -> Result<serde_json::Value>;

    async fn send_event(&self, event: InputEvent) -> Result<()>;

    async fn query_element(&self, selector: &str) -> Result<Option<ElementRef>>;

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementRef>>;

    async fn get_attribute(&self, element: ElementRef, name: &str) -> Result<Option<String>>;

    async fn bounding_box(&self, element: ElementRef) -> Result<Rect>;

    async fn focus(&self, element: ElementRef) -> Result<()>;

    /// Drop every element handle issued so far. Refs obtained earlier are
    /// stale afterwards.
    async fn release_elements(&self) -> Result<()>;

    async fn render(&self, path: &Path, format: ImageFormat) -> Result<()>;
}

/// Evaluate `script` and deserialize its result.
pub async fn evaluate_as<T, D>(driver: &D, script: &Script, args: Vec<serde_json::Value>) -> Result<T>
where
    T: DeserializeOwned,
    D: PageDriver + ?Sized,
{
    let value = driver.evaluate(script, args).await?;
    Ok(serde_json::from_value(value)?)
}
