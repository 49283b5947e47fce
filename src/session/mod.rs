//! Durable snapshots of the client's storage state.
//!
//! A snapshot is the full localStorage mapping captured after a successful
//! login. Restoring it into a fresh browser session skips the interactive
//! login on later runs.

pub mod provider;

use anyhow::{Context, Result};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Client-side storage state at a point in time. Keys and values are opaque
/// strings and round-trip byte-for-byte.
pub type SessionSnapshot = BTreeMap<String, String>;

/// Persists session snapshots as a JSON object of string to string.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// The previously saved snapshot, or `None` on first run.
    pub fn load(&self) -> Result<Option<SessionSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path).with_context(|| {
            format!("Failed to read session snapshot from {}", self.path.display())
        })?;

        let snapshot = serde_json::from_str(&content).with_context(|| {
            format!("Failed to parse session snapshot from {}", self.path.display())
        })?;

        Ok(Some(snapshot))
    }

    /// Replace any prior snapshot with this one.
    ///
    /// The content goes to a temporary file first and is renamed into place,
    /// so a concurrent `load` never observes a partial write.
    pub fn save(&self, snapshot: &SessionSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content =
            serde_json::to_string_pretty(snapshot).context("Failed to serialize session snapshot")?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, content)
            .with_context(|| format!("Failed to write session snapshot to {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path).with_context(|| {
            format!("Failed to move session snapshot into {}", self.path.display())
        })?;

        Ok(())
    }
}
