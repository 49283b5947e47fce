//! Authenticated session lifecycle.
//!
//! The provider owns the path from a cold start to a logged-in browser
//! session: restore a stored snapshot if one exists, verify the logged-in
//! marker, and fall back to an operator-driven interactive login when
//! verification fails.

use crate::browser::{self, BASE_URL};
use crate::config::Config;
use crate::session::{SessionSnapshot, SessionStore};
use anyhow::{bail, Context, Result};
use serde_json::json;
use thirtyfour::{By, WebDriver};

/// Element class that only renders once the client is authenticated.
const LOGIN_MARKER: &str = "ChatFolders";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Restoring,
    Verifying,
    AwaitingManualLogin,
    Ready,
    Failed,
}

/// External operator interface for the interactive login step.
///
/// The provider suspends on this when snapshot restore did not yield a
/// logged-in session; how the confirmation actually arrives is up to the
/// caller.
pub trait Operator {
    /// Block until the operator has completed the login in the visible
    /// browser window.
    fn confirm_login(&self) -> Result<()>;
}

/// Operator that waits for Enter on stdin.
pub struct StdinOperator;

impl Operator for StdinOperator {
    fn confirm_login(&self) -> Result<()> {
        println!("Not logged in. Log in manually in the browser window.");
        println!("Press Enter when done...");
        let mut line = String::new();
        std::io::stdin()
            .read_line(&mut line)
            .context("Failed to read confirmation from stdin")?;
        Ok(())
    }
}

/// Bring up a logged-in session, interactively if necessary.
///
/// Succeeds with a driver sitting on the chat list, or fails with an
/// authentication error after the single manual retry is exhausted.
pub async fn acquire(
    config: &Config,
    store: &SessionStore,
    operator: &dyn Operator,
) -> Result<WebDriver> {
    let mut driver = browser::connect(config, config.webdriver.headless).await?;
    let snapshot = store.load()?;
    let mut state = State::Fresh;

    loop {
        tracing::debug!("Session provider state: {:?}", state);
        state = match state {
            State::Fresh => {
                if snapshot.is_some() {
                    State::Restoring
                } else {
                    State::Verifying
                }
            }
            State::Restoring => {
                // The client only reads its stored state on a real page load,
                // so injection has to happen between a neutral load of the
                // origin and the navigation to the target surface.
                driver.goto(BASE_URL).await?;
                if let Some(snapshot) = &snapshot {
                    inject_snapshot(&driver, snapshot).await?;
                }
                State::Verifying
            }
            State::Verifying => {
                driver.goto(BASE_URL).await?;
                if verify(&driver, config).await? {
                    State::Ready
                } else {
                    State::AwaitingManualLogin
                }
            }
            State::AwaitingManualLogin => {
                if config.webdriver.headless {
                    // The operator needs a visible window to log in.
                    driver.quit().await?;
                    driver = browser::connect(config, false).await?;
                    driver.goto(BASE_URL).await?;
                }
                operator.confirm_login()?;
                if verify(&driver, config).await? {
                    let fresh = capture_snapshot(&driver).await?;
                    store.save(&fresh)?;
                    tracing::info!("Login confirmed, session snapshot saved");
                    State::Ready
                } else {
                    State::Failed
                }
            }
            State::Ready => return Ok(driver),
            State::Failed => {
                bail!("Authentication failed: client is still not logged in after manual login")
            }
        };
    }
}

/// Probe for the logged-in marker within the configured timeout.
async fn verify(driver: &WebDriver, config: &Config) -> Result<bool> {
    let marker =
        browser::wait_opt(driver, By::ClassName(LOGIN_MARKER), config.login_timeout()).await?;
    Ok(marker.is_some())
}

async fn inject_snapshot(driver: &WebDriver, snapshot: &SessionSnapshot) -> Result<()> {
    for (key, value) in snapshot {
        driver
            .execute(
                "localStorage.setItem(arguments[0], arguments[1]);",
                vec![json!(key), json!(value)],
            )
            .await
            .with_context(|| format!("Failed to restore session key {key}"))?;
    }
    tracing::info!("Restored session snapshot ({} keys)", snapshot.len());
    Ok(())
}

async fn capture_snapshot(driver: &WebDriver) -> Result<SessionSnapshot> {
    let ret = driver
        .execute(
            "return Object.fromEntries(Object.entries(localStorage));",
            Vec::new(),
        )
        .await
        .context("Failed to read client storage state")?;
    let snapshot = ret
        .convert()
        .context("Client storage state was not a string map")?;
    Ok(snapshot)
}
