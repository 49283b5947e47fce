//! Normalizes the client's chat-list UI into structured records.
//!
//! Every probe here is optional at the field level: a selector that matches
//! nothing yields an absent value for that one field, not a failed record.
//! Only the archived-chats entry point is required, and only for
//! [`collect_unread`].

use crate::browser::{self, BASE_URL};
use crate::config::Config;
use crate::data::{ConversationBatch, EntityRecord, MessageParts};
use anyhow::{bail, Result};
use std::time::Duration;
use thirtyfour::{By, WebDriver, WebElement};

// Chat list
const CHAT_ITEM: &str = ".chat-list .ListItem";
const ITEM_LINK: &str = "a.ListItem-button";
const ITEM_TITLE: &str = "h3";
const ONLINE_BADGE: &str = ".avatar-online";
const LAST_MESSAGE: &str = ".last-message";
const UNREAD_BADGE: &str = ".ChatBadge.unread";

// Archived/unread view
const ARCHIVED_ENTRY: &str = ".chat-item-archive";

// Open conversation
const MESSAGE: &str = ".Message";
const MESSAGE_TEXT: &str = ".text-content";
const MESSAGE_SENDER: &str = ".message-title";
const MESSAGE_TIME: &str = ".message-time";
const MESSAGE_VIDEO: &str = ".media-inner video";
const MESSAGE_IMAGE: &str = ".media-inner img";
const MESSAGE_STICKER: &str = ".StickerView";
const CHAT_TITLE: &str = ".MiddleColumn .chat-info h3";
const CHAT_TITLE_FALLBACK: &str = ".MiddleColumn .chat-info .title";

// Single-entity probe
const USER_STATUS: &str = "user-status";

/// Returned when the presence text probe times out.
pub const STATUS_SENTINEL: &str = "Error or user not found";

/// Entity id from a chat link target.
///
/// The id is the fragment portion of the href. Group and channel threads use
/// negative or non-numeric fragments and are not presence-tracked.
pub fn parse_entity_id(href: &str) -> Option<i64> {
    let (_, fragment) = href.split_once('#')?;
    let id: i64 = fragment.parse().ok()?;
    (id >= 0).then_some(id)
}

/// Scan the visible chat list into one record per trackable entity.
pub async fn list_entities(driver: &WebDriver) -> Result<Vec<EntityRecord>> {
    let items = driver.find_all(By::Css(CHAT_ITEM)).await?;
    let mut records = Vec::new();

    for item in &items {
        let Some(link) = browser::child_opt(item, By::Css(ITEM_LINK)).await? else {
            continue;
        };
        let Some(href) = link.attr("href").await? else {
            continue;
        };
        let Some(id) = parse_entity_id(&href) else {
            continue;
        };

        records.push(EntityRecord {
            id,
            is_online: browser::child_opt(item, By::Css(ONLINE_BADGE)).await?.is_some(),
            display_name: browser::child_text(item, By::Css(ITEM_TITLE)).await?,
            message_text: browser::child_text(item, By::Css(LAST_MESSAGE)).await?,
        });
    }

    Ok(records)
}

/// Probe one rendered message element for its parts.
pub async fn message_parts(elem: &WebElement) -> Result<MessageParts> {
    Ok(MessageParts {
        timestamp: browser::child_text(elem, By::Css(MESSAGE_TIME)).await?,
        sender: browser::child_text(elem, By::Css(MESSAGE_SENDER)).await?,
        has_video: browser::child_opt(elem, By::Css(MESSAGE_VIDEO)).await?.is_some(),
        has_image: browser::child_opt(elem, By::Css(MESSAGE_IMAGE)).await?.is_some(),
        has_sticker: browser::child_opt(elem, By::Css(MESSAGE_STICKER)).await?.is_some(),
        body: browser::child_text(elem, By::Css(MESSAGE_TEXT)).await?,
    })
}

/// Single-line human-readable description of one message element.
pub async fn extract_message(elem: &WebElement) -> Result<String> {
    Ok(message_parts(elem).await?.render())
}

/// Collect unread conversations from the archived-chats view.
///
/// A chat contributes only when both its resolved name and its joined message
/// text are non-empty. A missing entry point is fatal: without the archived
/// view there is no unread content to summarize.
pub async fn collect_unread(driver: &WebDriver, config: &Config) -> Result<ConversationBatch> {
    let timeout = config.probe_timeout();
    let Some(entry) = browser::wait_opt(driver, By::Css(ARCHIVED_ENTRY), timeout).await? else {
        bail!("Archived-chats entry point not found");
    };
    entry.click().await?;

    let mut batch = ConversationBatch::new();
    let item_count = driver.find_all(By::Css(CHAT_ITEM)).await?.len();

    for index in 0..item_count {
        // Opening a chat rerenders the list, so re-query instead of holding
        // on to the original elements.
        let items = driver.find_all(By::Css(CHAT_ITEM)).await?;
        let Some(item) = items.get(index) else {
            break;
        };
        if browser::child_opt(item, By::Css(UNREAD_BADGE)).await?.is_none() {
            continue;
        }

        item.click().await?;
        if browser::wait_opt(driver, By::Css(MESSAGE), timeout).await?.is_none() {
            tracing::debug!("No messages rendered for unread chat at index {index}");
            continue;
        }

        let mut lines = Vec::new();
        for message in driver.find_all(By::Css(MESSAGE)).await? {
            let line = extract_message(&message).await?;
            if !line.is_empty() {
                lines.push(line);
            }
        }
        let text = lines.join("\n");

        let name = match browser::find_text(driver, By::Css(CHAT_TITLE)).await? {
            Some(name) => Some(name),
            None => browser::find_text(driver, By::Css(CHAT_TITLE_FALLBACK)).await?,
        };

        if let Some(name) = name {
            if !text.is_empty() {
                batch.push((name, text));
            }
        }
    }

    Ok(batch)
}

/// One-shot probe of a single user's presence text.
///
/// A timeout resolves to [`STATUS_SENTINEL`], not an error: the probe missing
/// is a domain result, not a process failure.
pub async fn user_status(driver: &WebDriver, user_id: i64, timeout: Duration) -> Result<String> {
    // The client ignores pure fragment changes; a detour through another
    // origin forces a full reload of the target chat.
    driver.goto("https://google.com/").await?;
    let url = format!("{BASE_URL}#{user_id}");
    driver.goto(url.as_str()).await?;

    match browser::wait_opt(driver, By::ClassName(USER_STATUS), timeout).await? {
        Some(el) => Ok(el.text().await?.trim().to_string()),
        None => Ok(STATUS_SENTINEL.to_string()),
    }
}
