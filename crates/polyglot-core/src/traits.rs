use crate::{
    error::PolyglotError,
    message::{ChannelPost, Event, UserProfile},
};
use async_trait::async_trait;

/// Translation provider trait.
///
/// The remote service performing language detection and translation is a
/// black box: callers must not assume idempotence or determinism of
/// detection for short or ambiguous text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Detect the language of `text`, returning an ISO-639-1-like code.
    async fn detect(&self, text: &str) -> Result<String, PolyglotError>;

    /// Translate `text` into `target`. `source` is a hint; `None` lets the
    /// provider detect it.
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Result<String, PolyglotError>;

    /// Check if the provider is reachable and ready.
    async fn is_available(&self) -> bool;
}

/// Messaging channel trait — the event source.
#[async_trait]
pub trait Channel: Send + Sync {
    /// Human-readable channel name.
    fn name(&self) -> &str;

    /// Start listening for incoming events.
    /// Returns a receiver that yields messages and command invocations.
    async fn start(&self) -> Result<tokio::sync::mpsc::Receiver<Event>, PolyglotError>;

    /// Graceful shutdown.
    async fn stop(&self) -> Result<(), PolyglotError>;
}

/// Delivery sink trait — everything the bot posts back to the platform.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    /// Post a channel-visible message, optionally threaded.
    async fn post_channel_message(
        &self,
        channel_id: &str,
        post: &ChannelPost,
    ) -> Result<(), PolyglotError>;

    /// Post a message visible only to `user_id` in `channel_id`.
    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<(), PolyglotError>;

    /// Post to the channel under the alternate (user) identity.
    async fn post_as_alternate(&self, channel_id: &str, text: &str) -> Result<(), PolyglotError>;

    /// Fetch a user's display name and avatar for attribution.
    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PolyglotError>;

    /// Whether the bot can see the channel (membership precondition).
    async fn is_channel_accessible(&self, channel_id: &str) -> bool;
}
