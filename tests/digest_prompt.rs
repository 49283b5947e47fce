//! Tests for digest prompt rendering.

use argus::data::ConversationBatch;
use argus::digest::{render_prompt, PROMPT_PREFIX};

#[test]
fn empty_batch_renders_prefix_only() {
    let batch = ConversationBatch::new();

    assert_eq!(render_prompt(&batch), PROMPT_PREFIX);
}

#[test]
fn prompt_starts_with_the_instructional_prefix() {
    let batch = vec![("Alice".to_string(), "[12:01] <Alice> hi".to_string())];

    assert!(render_prompt(&batch).starts_with(PROMPT_PREFIX));
}

#[test]
fn one_paragraph_per_conversation_in_order() {
    let batch = vec![
        ("Alice".to_string(), "line one\nline two".to_string()),
        ("Work".to_string(), "[image] deck attached".to_string()),
    ];

    let prompt = render_prompt(&batch);

    let alice = prompt.find("Chat: Alice\nline one\nline two").unwrap();
    let work = prompt.find("Chat: Work\n[image] deck attached").unwrap();
    assert!(alice < work);
}

#[test]
fn duplicate_chat_names_both_appear() {
    let batch = vec![
        ("Alice".to_string(), "first".to_string()),
        ("Alice".to_string(), "second".to_string()),
    ];

    let prompt = render_prompt(&batch);

    assert_eq!(prompt.matches("Chat: Alice").count(), 2);
    assert!(prompt.contains("first"));
    assert!(prompt.contains("second"));
}
