//! Durable per-entity transition logs.

use crate::data::TransitionEvent;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::PathBuf;

/// Appends transition events, one file per entity id.
pub struct EventLog {
    dir: PathBuf,
}

impl EventLog {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Append one event to its entity's log, creating the directory and file
    /// on first use. Prior lines are never truncated or reordered. A write
    /// failure propagates: the durable side effect is the whole point.
    pub fn append(&self, event: &TransitionEvent) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create log directory {}", self.dir.display()))?;

        let path = self.path_for(event.entity_id);
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;

        let line = format!(
            "{} {}\n",
            event.timestamp.format("[%Y-%m-%d %H:%M:%S]"),
            event.new_state
        );
        file.write_all(line.as_bytes())
            .with_context(|| format!("Failed to append to log file {}", path.display()))?;

        Ok(())
    }

    /// Log file path for one entity.
    pub fn path_for(&self, entity_id: i64) -> PathBuf {
        self.dir.join(format!("{entity_id}.log"))
    }
}
