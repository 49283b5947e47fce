//! Tests for edge-triggered presence tracking.
//!
//! The tracker's contract: the first observation of an entity installs its
//! baseline silently, later observations emit exactly one event per flip,
//! and entities absent from a poll are left untouched.

use argus::data::{EntityRecord, Presence};
use argus::presence::PresenceTracker;

fn record(id: i64, is_online: bool) -> EntityRecord {
    EntityRecord {
        id,
        is_online,
        display_name: None,
        message_text: None,
    }
}

#[test]
fn first_sighting_is_silent() {
    let mut tracker = PresenceTracker::new();

    let events = tracker.observe(&[record(42, true)]);

    assert!(events.is_empty());
    assert_eq!(tracker.last_known(42), Some(true));
}

#[test]
fn repeated_equal_observations_emit_nothing() {
    let mut tracker = PresenceTracker::new();

    tracker.observe(&[record(42, true)]);
    let events = tracker.observe(&[record(42, true)]);

    assert!(events.is_empty());
}

#[test]
fn events_match_adjacent_differing_pairs() {
    // [false, false, true, true, false] -> flips at samples 3 and 5 only.
    let mut tracker = PresenceTracker::new();
    let mut all_events = Vec::new();

    for observed in [false, false, true, true, false] {
        all_events.extend(tracker.observe(&[record(7, observed)]));
    }

    assert_eq!(all_events.len(), 2);
    assert_eq!(all_events[0].new_state, Presence::Online);
    assert_eq!(all_events[1].new_state, Presence::Offline);
}

#[test]
fn newly_seen_entity_flipping_every_poll() {
    // First sample is the silent baseline; the two flips after it each emit.
    let mut tracker = PresenceTracker::new();
    let mut all_events = Vec::new();

    for observed in [false, true, false] {
        all_events.extend(tracker.observe(&[record(9, observed)]));
    }

    assert_eq!(all_events.len(), 2);
    assert_eq!(all_events[0].new_state, Presence::Online);
    assert_eq!(all_events[1].new_state, Presence::Offline);
}

#[test]
fn absent_entity_is_untouched() {
    let mut tracker = PresenceTracker::new();
    tracker.observe(&[record(42, true)]);

    // Entity 42 drops out of the next two polls entirely.
    assert!(tracker.observe(&[]).is_empty());
    assert!(tracker.observe(&[record(1, false)]).is_empty());
    assert_eq!(tracker.last_known(42), Some(true));

    // Reappearing with the same state is not a transition.
    assert!(tracker.observe(&[record(42, true)]).is_empty());

    // Reappearing flipped is exactly one.
    let events = tracker.observe(&[record(42, false)]);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity_id, 42);
    assert_eq!(events[0].new_state, Presence::Offline);
}

#[test]
fn entities_are_tracked_independently() {
    let mut tracker = PresenceTracker::new();

    tracker.observe(&[record(1, true), record(2, false)]);
    let events = tracker.observe(&[record(1, false), record(2, false)]);

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].entity_id, 1);
    assert_eq!(events[0].new_state, Presence::Offline);
    assert_eq!(tracker.tracked(), 2);
}

#[test]
fn one_poll_can_emit_events_for_multiple_entities() {
    let mut tracker = PresenceTracker::new();

    tracker.observe(&[record(1, false), record(2, true)]);
    let events = tracker.observe(&[record(1, true), record(2, false)]);

    assert_eq!(events.len(), 2);
    let ids: Vec<i64> = events.iter().map(|e| e.entity_id).collect();
    assert_eq!(ids, vec![1, 2]);
}
