//! Slack Socket Mode and Web API deserialization types.

use serde::Deserialize;

/// A Socket Mode envelope. Every envelope with an `envelope_id` must be
/// acknowledged promptly or Slack re-delivers it.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(rename = "type")]
    pub kind: String,
    pub envelope_id: Option<String>,
    pub payload: Option<serde_json::Value>,
}

/// Payload of an `events_api` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct EventsApiPayload {
    pub event: RawEvent,
}

/// A raw Events API event. Only `message` events are mapped; fields missing
/// on other event types stay `None`.
#[derive(Debug, Deserialize)]
pub(crate) struct RawEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub channel: Option<String>,
    pub user: Option<String>,
    pub text: Option<String>,
    pub ts: Option<String>,
    pub thread_ts: Option<String>,
    pub subtype: Option<String>,
    pub bot_id: Option<String>,
}

/// Payload of a `slash_commands` envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct SlashCommandPayload {
    pub command: String,
    pub channel_id: String,
    pub user_id: String,
    #[serde(default)]
    pub text: String,
}

/// Response of `apps.connections.open`.
#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionsOpenResponse {
    pub ok: bool,
    pub url: Option<String>,
    pub error: Option<String>,
}

/// Generic Web API response wrapper. Every call reports `ok`.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiResponse {
    pub ok: bool,
    pub error: Option<String>,
}

/// Response of `users.info`.
#[derive(Debug, Deserialize)]
pub(crate) struct UsersInfoResponse {
    pub ok: bool,
    pub user: Option<SlackUser>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SlackUser {
    pub name: String,
    pub profile: Option<SlackProfile>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SlackProfile {
    pub display_name: Option<String>,
    pub image_24: Option<String>,
}
