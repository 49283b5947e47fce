//! Tests for session snapshot persistence.

use argus::session::{SessionSnapshot, SessionStore};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn snapshot(pairs: &[(&str, &str)]) -> SessionSnapshot {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn roundtrip() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));

    let original = snapshot(&[
        ("dc2_auth_key", "a1b2c3"),
        ("user_auth", r#"{"dcID":2,"id":"777000"}"#),
        ("tt-global-state", "{\"byKey\":{}}"),
    ]);

    store.save(&original).unwrap();
    let loaded = store.load().unwrap().unwrap();

    assert_eq!(loaded, original);
}

#[test]
fn keys_and_values_roundtrip_byte_for_byte() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));

    // Keys are opaque: whitespace, quotes, newlines and non-ASCII must all
    // survive persistence unchanged.
    let original = snapshot(&[
        ("key with spaces", "value\nwith\nnewlines"),
        ("quo\"ted", "back\\slash"),
        ("ключ", "значение"),
        ("", "empty key is still a key"),
    ]);

    store.save(&original).unwrap();
    assert_eq!(store.load().unwrap().unwrap(), original);
}

#[test]
fn load_missing_returns_none() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("nonexistent.json"));

    assert!(store.load().unwrap().is_none());
}

#[test]
fn save_overwrites_rather_than_merges() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));

    store.save(&snapshot(&[("a", "1"), ("b", "2")])).unwrap();
    store.save(&snapshot(&[("c", "3")])).unwrap();

    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded, snapshot(&[("c", "3")]));
}

#[test]
fn save_creates_parent_directories() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("nested/dir/session.json"));

    store.save(&snapshot(&[("k", "v")])).unwrap();

    assert_eq!(store.load().unwrap().unwrap(), snapshot(&[("k", "v")]));
}

#[test]
fn save_leaves_no_temporary_file_behind() {
    let temp_dir = TempDir::new().unwrap();
    let store = SessionStore::new(temp_dir.path().join("session.json"));

    store.save(&snapshot(&[("k", "v")])).unwrap();

    let entries: Vec<String> = std::fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(entries, vec!["session.json".to_string()]);
}
