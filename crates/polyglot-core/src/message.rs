use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An inbound event from the chat platform.
#[derive(Debug, Clone)]
pub enum Event {
    /// A regular channel message.
    Message(MessageEvent),
    /// A slash-command invocation.
    Command(CommandInvocation),
}

/// A message posted in a channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageEvent {
    pub channel_id: String,
    pub sender_id: String,
    pub text: String,
    /// Platform message timestamp. Doubles as the message id and the
    /// thread anchor for replies.
    pub ts: String,
    /// Set when the message itself was posted inside a thread.
    pub thread_ts: Option<String>,
    /// Platform subtype (e.g. "file_share", "message_changed").
    pub subtype: Option<String>,
    /// Set when the message originates from a bot identity.
    pub bot_id: Option<String>,
    pub received_at: DateTime<Utc>,
}

/// A slash-command invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandInvocation {
    /// Command name including the leading slash (e.g. "/autotranslate").
    pub command: String,
    pub channel_id: String,
    pub user_id: String,
    /// Raw argument string after the command name.
    pub text: String,
}

/// A channel-visible post.
#[derive(Debug, Clone, Default)]
pub struct ChannelPost {
    /// Plain-text fallback content.
    pub text: String,
    /// Optional rich layout (Slack Block Kit), takes precedence over `text`.
    pub blocks: Option<serde_json::Value>,
    /// Thread anchor; `None` posts to the channel top level.
    pub thread_ts: Option<String>,
}

/// Sender identity fetched from the platform for attribution.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}
