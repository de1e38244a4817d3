use anyhow::Context;
use cronometer_scraper::browser::BrowserSession;
use cronometer_scraper::cache::ScrapeCache;
use cronometer_scraper::config::{Config, Credentials};
use cronometer_scraper::scraper::Scraper;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::default();
    let credentials = Credentials::from_env()?;
    let cache = ScrapeCache::load(&config.archive_dir)
        .with_context(|| format!("Failed to load archives from {}", config.archive_dir.display()))?;

    let session = BrowserSession::launch(&config).await?;
    let driver = match session.open(&config.base_url).await {
        Ok(driver) => driver,
        Err(e) => {
            session.close().await;
            return Err(e);
        }
    };

    let today = chrono::Local::now().date_naive();
    let mut scraper = Scraper::new(driver, cache, config);

    // Whichever comes first: the run finishing or an interrupt.
    let outcome = tokio::select! {
        result = scraper.run(&credentials, today) => Some(result),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received interrupt signal, shutting down");
            None
        }
    };

    // Always kill Chrome before exiting
    session.close().await;

    match outcome {
        Some(result) => {
            let summary = result.context("Scrape failed")?;
            tracing::info!("Done: {:?}", summary);
            Ok(())
        }
        None => anyhow::bail!("Interrupted"),
    }
}
