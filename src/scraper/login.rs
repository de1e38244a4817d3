use std::time::Duration;

use crate::browser::{evaluate_as, scripts, PageDriver};
use crate::config::{Credentials, Timing};
use crate::error::{Error, Result};
use crate::interaction::{click, type_text, wait_for_selector};
use crate::selectors::*;

/// Sign in from the landing page and wait for the diary to render.
pub async fn login<D: PageDriver + ?Sized>(
    driver: &D,
    credentials: &Credentials,
    timing: &Timing,
) -> Result<()> {
    let settle = Duration::from_millis(timing.login_settle_ms);

    let link = driver
        .query_element(LOGIN_LINK)
        .await?
        .ok_or_else(|| Error::ElementNotFound(LOGIN_LINK.to_string()))?;
    click(driver, link).await?;
    tokio::time::sleep(settle).await;

    let email = driver.query_element(LOGIN_EMAIL).await?;
    let password = driver.query_element(LOGIN_PASSWORD).await?;
    let submit = driver.query_element(LOGIN_SUBMIT).await?;
    let (email, password, submit) = match (email, password, submit) {
        (Some(email), Some(password), Some(submit)) => (email, password, submit),
        (email, password, submit) => {
            let missing = [(email, "email"), (password, "password"), (submit, "submit")]
                .into_iter()
                .filter(|(found, _)| found.is_none())
                .map(|(_, name)| name)
                .collect();
            return Err(Error::LoginForm(missing));
        }
    };

    type_text(driver, email, &credentials.username).await?;
    type_text(driver, password, &credentials.password).await?;
    click(driver, submit).await?;
    tokio::time::sleep(settle).await;

    wait_for_selector(
        driver,
        SERVINGS_PANEL,
        timing.element_timeout_ms,
        timing.element_poll_ms,
    )
    .await?;
    tracing::info!("logged in as {}", credentials.username);

    // The help launcher floats over the diary and steals clicks.
    match evaluate_as::<bool, _>(driver, &scripts::REMOVE_ELEMENT, vec![HELP_LAUNCHER.into()]).await {
        Ok(true) => tracing::debug!("removed help launcher"),
        Ok(false) => {}
        Err(e) => tracing::warn!("could not remove help launcher: {}", e),
    }
    Ok(())
}
