use std::path::{Path, PathBuf};

use crate::browser::{evaluate_as, scripts, ImageFormat, PageDriver};
use crate::error::Result;

/// Numbered screenshots and markup dumps for post-mortems.
pub struct Diagnostics {
    dir: PathBuf,
    format: ImageFormat,
    counter: u32,
}

impl Diagnostics {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            format: ImageFormat::Jpeg,
            counter: 0,
        }
    }

    /// Path for the next screenshot: `sc{n}` plus `-{label}` when given.
    fn next_path(&mut self, label: &str) -> PathBuf {
        let suffix = if label.is_empty() {
            String::new()
        } else {
            format!("-{}", label)
        };
        let name = format!("sc{}{}.{}", self.counter, suffix, self.format.extension());
        self.counter += 1;
        self.dir.join(name)
    }

    pub async fn snapshot<D: PageDriver + ?Sized>(&mut self, driver: &D, label: &str) -> Result<PathBuf> {
        let path = self.next_path(label);
        std::fs::create_dir_all(&self.dir)?;
        driver.render(&path, self.format).await?;
        tracing::debug!("snapshot {}", path.display());
        Ok(path)
    }

    /// Write the page body's markup to `path`.
    pub async fn dump_markup<D: PageDriver + ?Sized>(&self, driver: &D, path: &Path) -> Result<()> {
        tracing::info!("dumping HTML to {}", path.display());
        let markup: String = evaluate_as(driver, &scripts::BODY_MARKUP, vec![]).await?;
        std::fs::write(path, markup)?;
        Ok(())
    }

    pub fn taken(&self) -> u32 {
        self.counter
    }
}
