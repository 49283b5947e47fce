use chrono::{DateTime, Local};

/// One normalized chat-list entry from a single poll.
///
/// Records are ephemeral: the extractor produces a fresh batch every poll and
/// the tracker consumes it immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRecord {
    /// Stable numeric user id. Group and channel threads never make it into
    /// a record; the extractor filters them by id.
    pub id: i64,
    pub is_online: bool,
    pub display_name: Option<String>,
    pub message_text: Option<String>,
}

/// Ordered (chat name, joined messages) pairs feeding one summarization
/// request. Chat names need not be unique.
pub type ConversationBatch = Vec<(String, String)>;

/// Presence value carried by a transition event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Online,
    Offline,
}

impl Presence {
    pub fn from_online(is_online: bool) -> Self {
        if is_online {
            Self::Online
        } else {
            Self::Offline
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Online => "online",
            Self::Offline => "offline",
        }
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single online/offline flip for one entity. Immutable once constructed;
/// appended to the entity's log and never revisited.
#[derive(Debug, Clone)]
pub struct TransitionEvent {
    pub entity_id: i64,
    pub new_state: Presence,
    pub timestamp: DateTime<Local>,
}

/// Pieces probed out of one rendered message element. Absent probes stay
/// `None`/`false`; partial messages are valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageParts {
    pub timestamp: Option<String>,
    pub sender: Option<String>,
    pub has_video: bool,
    pub has_image: bool,
    pub has_sticker: bool,
    pub body: Option<String>,
}

impl MessageParts {
    /// Single-line rendering: bracketed timestamp, angle-bracketed sender,
    /// `[video]` or `[image]` (video wins when both are present), `[sticker]`
    /// independently, then the text body. Missing parts are omitted.
    pub fn render(&self) -> String {
        let mut out: Vec<String> = Vec::new();
        if let Some(ts) = &self.timestamp {
            out.push(format!("[{ts}]"));
        }
        if let Some(sender) = &self.sender {
            out.push(format!("<{sender}>"));
        }
        if self.has_video {
            out.push("[video]".to_string());
        } else if self.has_image {
            out.push("[image]".to_string());
        }
        if self.has_sticker {
            out.push("[sticker]".to_string());
        }
        if let Some(body) = &self.body {
            out.push(body.clone());
        }
        out.join(" ").trim().to_string()
    }
}
