//! Continuous presence-monitoring loop.

use crate::config::Config;
use crate::eventlog::EventLog;
use crate::extract;
use crate::presence::PresenceTracker;
use anyhow::Result;
use thirtyfour::WebDriver;
use tokio::time::MissedTickBehavior;

/// Poll the chat list on a fixed interval until a shutdown signal arrives.
///
/// Each tick is a full fresh extraction. An event detected but not yet
/// appended when the process dies is lost; nothing is replayed on restart.
pub async fn run(config: &Config, driver: &WebDriver) -> Result<()> {
    let mut tracker = PresenceTracker::new();
    let log = EventLog::new(config.logs_dir()?);

    let mut interval = tokio::time::interval(config.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    tracing::info!("Watching presence, polling every {:?}", config.poll_interval());

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping watch loop");
                return Ok(());
            }
            _ = interval.tick() => {
                let records = extract::list_entities(driver).await?;
                tracing::debug!("Polled {} entities, {} tracked", records.len(), tracker.tracked());
                for event in tracker.observe(&records) {
                    tracing::info!("Entity {} is now {}", event.entity_id, event.new_state);
                    log.append(&event)?;
                }
            }
        }
    }
}
