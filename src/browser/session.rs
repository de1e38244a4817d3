use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;

use super::chrome::ChromeDriver;
use super::launcher::{chrome_args, find_chrome_binary};
use crate::config::Config;

/// Owns the Chrome process and its CDP connection for the length of a run.
pub struct BrowserSession {
    browser: Browser,
    handler_task: tokio::task::JoinHandle<()>,
    // Dropped (and deleted) after the browser is gone.
    _profile_dir: tempfile::TempDir,
}

impl BrowserSession {
    /// Launch a new browser and establish CDP connection.
    pub async fn launch(config: &Config) -> Result<Self> {
        let profile_dir = tempfile::tempdir().context("Failed to create Chrome profile dir")?;
        let (width, height) = config.viewport;

        let mut builder = BrowserConfig::builder()
            .chrome_executable(find_chrome_binary()?)
            .user_data_dir(profile_dir.path())
            .window_size(width, height)
            .viewport(None);

        if !config.headless {
            builder = builder.with_head();
        }
        for arg in chrome_args(config.headless) {
            builder = builder.arg(arg);
        }

        let browser_config = builder.build().map_err(|e| anyhow::anyhow!("{}", e))?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .context("Failed to launch Chrome")?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler event error (continuing): {}", e);
                }
            }
        });

        tracing::info!("Browser session started (headless: {})", config.headless);

        Ok(Self {
            browser,
            handler_task,
            _profile_dir: profile_dir,
        })
    }

    /// Open `url` in a fresh tab and wrap it in a driver.
    pub async fn open(&self, url: &str) -> Result<ChromeDriver> {
        let page = self
            .browser
            .new_page(url)
            .await
            .with_context(|| format!("Failed to open {}", url))?;
        page.wait_for_navigation()
            .await
            .with_context(|| format!("{} did not finish loading", url))?;

        let title = page.get_title().await?.unwrap_or_default();
        tracing::info!("The title of the page is: {}", title);

        Ok(ChromeDriver::new(page))
    }

    /// Close the browser.
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Failed to close Chrome cleanly: {}", e);
        }
        let _ = self.browser.wait().await;
        self.handler_task.abort();
    }
}
