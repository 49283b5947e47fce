//! Unread-conversation digest via an external summarization service.
//!
//! The whole batch goes out as one prompt in a single blocking request, and
//! the service's text comes back verbatim. Failures surface to the caller
//! unrecovered; there is no retry here.

use crate::data::ConversationBatch;
use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Instructional prefix sent ahead of the rendered batch.
pub const PROMPT_PREFIX: &str = "These are unread Telegram conversations, one section per chat. \
Write a short digest: for each chat, one or two sentences covering what happened \
and anything that needs a reply.";

/// Shared HTTP client for summarization requests
static HTTP_CLIENT: Lazy<reqwest::Client> = Lazy::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(60))
        .connect_timeout(Duration::from_secs(10))
        .build()
        .expect("Failed to create HTTP client")
});

/// Render the batch as a single prompt, one paragraph per conversation.
pub fn render_prompt(batch: &ConversationBatch) -> String {
    let mut prompt = String::from(PROMPT_PREFIX);
    for (chat_name, messages) in batch {
        prompt.push_str("\n\nChat: ");
        prompt.push_str(chat_name);
        prompt.push('\n');
        prompt.push_str(messages);
    }
    prompt
}

/// Summarize the batch through the external service and return its text.
pub async fn summarize(api_key: &str, model: &str, batch: &ConversationBatch) -> Result<String> {
    let request = GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![Part {
                text: render_prompt(batch),
            }],
        }],
    };

    let url = format!("{API_BASE_URL}/{model}:generateContent?key={api_key}");
    let response = HTTP_CLIENT
        .post(&url)
        .json(&request)
        .send()
        .await
        .context("Summarization request failed")?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        anyhow::bail!("Summarization service returned {status}: {body}");
    }

    let parsed: GenerateContentResponse = response
        .json()
        .await
        .context("Failed to parse summarization response")?;

    parsed
        .candidates
        .and_then(|mut candidates| candidates.pop())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .context("Summarization response contained no text")
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}
