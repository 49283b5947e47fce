//! WebDriver plumbing shared by the session provider and the extractor.

use crate::config::Config;
use anyhow::{Context, Result};
use std::time::Duration;
use thirtyfour::{By, DesiredCapabilities, WebDriver, WebElement};
use tokio::time::Instant;

/// Target surface of the monitored client.
pub const BASE_URL: &str = "https://web.telegram.org/a/";

/// How often bounded waits re-probe the page.
const WAIT_STEP: Duration = Duration::from_millis(250);

pub async fn connect(config: &Config, headless: bool) -> Result<WebDriver> {
    let mut caps = DesiredCapabilities::firefox();
    if headless {
        caps.set_headless()?;
    }
    let driver = WebDriver::new(config.webdriver.url.as_str(), caps)
        .await
        .with_context(|| format!("Failed to connect to WebDriver at {}", config.webdriver.url))?;
    Ok(driver)
}

/// First match for a selector, `None` when nothing matches.
///
/// Absence is folded into `None`; driver-level errors still propagate.
pub async fn find_opt(driver: &WebDriver, by: By) -> Result<Option<WebElement>> {
    Ok(driver.find_all(by).await?.into_iter().next())
}

/// Like [`find_opt`] but scoped to a parent element.
pub async fn child_opt(elem: &WebElement, by: By) -> Result<Option<WebElement>> {
    Ok(elem.find_all(by).await?.into_iter().next())
}

/// Non-empty trimmed text of the first match under a parent element, if any.
pub async fn child_text(elem: &WebElement, by: By) -> Result<Option<String>> {
    match child_opt(elem, by).await? {
        Some(el) => Ok(non_empty(el.text().await?)),
        None => Ok(None),
    }
}

/// Non-empty trimmed text of the first page-wide match, if any.
pub async fn find_text(driver: &WebDriver, by: By) -> Result<Option<String>> {
    match find_opt(driver, by).await? {
        Some(el) => Ok(non_empty(el.text().await?)),
        None => Ok(None),
    }
}

/// Bounded wait for a selector to appear. `None` on timeout.
pub async fn wait_opt(driver: &WebDriver, by: By, timeout: Duration) -> Result<Option<WebElement>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(el) = find_opt(driver, by.clone()).await? {
            return Ok(Some(el));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        tokio::time::sleep(WAIT_STEP).await;
    }
}

fn non_empty(text: String) -> Option<String> {
    let text = text.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
