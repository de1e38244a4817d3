//! Polling synchronizer.
//!
//! The diary never tells us when it has finished reacting to an input, so
//! every "wait for the page" in the crate is a bounded poll through
//! [`wait_until`]. It is the only place the scraper suspends on the page.

use std::future::Future;
use std::time::{Duration, Instant};

use crate::browser::PageDriver;
use crate::error::{Error, Result};

/// Poll `predicate` until it returns `Ok(true)` or `timeout_ms` elapses.
///
/// The predicate is evaluated once before any sleep, so a condition that
/// already holds returns immediately. A predicate error counts as "not yet":
/// the page may be mid-navigation while we poll it.
pub async fn wait_until<F, Fut>(
    mut predicate: F,
    timeout_ms: u64,
    poll_interval_ms: u64,
    description: &str,
) -> Result<()>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<bool>>,
{
    let timeout = Duration::from_millis(timeout_ms);
    let interval = Duration::from_millis(poll_interval_ms);
    let start = Instant::now();

    loop {
        match predicate().await {
            Ok(true) => return Ok(()),
            Ok(false) => {}
            Err(e) => tracing::debug!("wait_until({}): predicate failed: {}", description, e),
        }

        if start.elapsed() >= timeout {
            return Err(Error::Timeout {
                description: description.to_string(),
                timeout_ms,
            });
        }
        tokio::time::sleep(interval).await;
    }
}

/// Wait up to `timeout_ms` for a selector to resolve to an element.
pub async fn wait_for_selector<D: PageDriver + ?Sized>(
    driver: &D,
    selector: &str,
    timeout_ms: u64,
    poll_interval_ms: u64,
) -> Result<()> {
    wait_until(
        || async move { driver.query_element(selector).await.map(|el| el.is_some()) },
        timeout_ms,
        poll_interval_ms,
        &format!("element {:?}", selector),
    )
    .await
}
