//! Edge-triggered presence tracking.

use crate::data::{EntityRecord, Presence, TransitionEvent};
use chrono::Local;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Per-entity last-known-state map, fed one record batch per poll.
///
/// The first observation of an id installs its baseline silently; only later
/// flips produce events. Entities absent from a poll keep their state
/// untouched. State lives for the process only and is rebuilt empty on
/// restart.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    last_known: HashMap<i64, bool>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume one poll's records, returning a transition event for every
    /// entity whose observed state differs from its last known state.
    pub fn observe(&mut self, records: &[EntityRecord]) -> Vec<TransitionEvent> {
        let mut events = Vec::new();

        for record in records {
            match self.last_known.entry(record.id) {
                Entry::Vacant(slot) => {
                    // First sighting establishes the baseline, no event.
                    slot.insert(record.is_online);
                }
                Entry::Occupied(mut slot) => {
                    if *slot.get() != record.is_online {
                        slot.insert(record.is_online);
                        events.push(TransitionEvent {
                            entity_id: record.id,
                            new_state: Presence::from_online(record.is_online),
                            timestamp: Local::now(),
                        });
                    }
                }
            }
        }

        events
    }

    /// Last known state for one entity, if it has ever been observed.
    pub fn last_known(&self, id: i64) -> Option<bool> {
        self.last_known.get(&id).copied()
    }

    /// Number of entities currently tracked.
    pub fn tracked(&self) -> usize {
        self.last_known.len()
    }
}
