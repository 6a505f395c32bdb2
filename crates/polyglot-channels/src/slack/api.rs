//! Slack Web API client and DeliverySink implementation.

use super::types::{ApiResponse, ConnectionsOpenResponse, UsersInfoResponse};
use async_trait::async_trait;
use polyglot_core::{
    error::PolyglotError,
    message::{ChannelPost, UserProfile},
    traits::DeliverySink,
};
use serde_json::{json, Value};
use tracing::debug;

const SLACK_BASE_URL: &str = "https://slack.com/api";

/// Slack Web API client. Holds the bot token and, optionally, a user token
/// for posting under the alternate identity.
pub struct SlackApi {
    client: reqwest::Client,
    bot_token: String,
    user_token: Option<String>,
}

impl SlackApi {
    pub fn new(bot_token: String, user_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_token,
            user_token,
        }
    }

    /// POST a Web API method and check Slack's `ok` field.
    async fn call(&self, token: &str, method: &str, body: Value) -> Result<(), PolyglotError> {
        debug!("slack: POST {method}");
        let resp = self
            .client
            .post(format!("{SLACK_BASE_URL}/{method}"))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await
            .map_err(|e| PolyglotError::Channel(format!("slack {method} failed: {e}")))?;

        let parsed: ApiResponse = resp
            .json()
            .await
            .map_err(|e| PolyglotError::Channel(format!("slack {method} parse failed: {e}")))?;

        if !parsed.ok {
            return Err(PolyglotError::Channel(format!(
                "slack {method} returned error: {}",
                parsed.error.unwrap_or_default()
            )));
        }
        Ok(())
    }

    /// Open a Socket Mode connection and return the websocket URL.
    pub(crate) async fn connections_open(&self, app_token: &str) -> Result<String, PolyglotError> {
        let resp = self
            .client
            .post(format!("{SLACK_BASE_URL}/apps.connections.open"))
            .bearer_auth(app_token)
            .send()
            .await
            .map_err(|e| PolyglotError::Channel(format!("apps.connections.open failed: {e}")))?;

        let parsed: ConnectionsOpenResponse = resp.json().await.map_err(|e| {
            PolyglotError::Channel(format!("apps.connections.open parse failed: {e}"))
        })?;

        if !parsed.ok {
            return Err(PolyglotError::Channel(format!(
                "apps.connections.open returned error: {}",
                parsed.error.unwrap_or_default()
            )));
        }
        parsed
            .url
            .ok_or_else(|| PolyglotError::Channel("apps.connections.open returned no url".into()))
    }
}

#[async_trait]
impl DeliverySink for SlackApi {
    async fn post_channel_message(
        &self,
        channel_id: &str,
        post: &ChannelPost,
    ) -> Result<(), PolyglotError> {
        let mut body = json!({ "channel": channel_id });
        if let Some(ref blocks) = post.blocks {
            body["blocks"] = blocks.clone();
            // Fallback for notifications and clients without Block Kit.
            body["text"] = json!(post.text);
        } else {
            body["text"] = json!(post.text);
        }
        if let Some(ref ts) = post.thread_ts {
            body["thread_ts"] = json!(ts);
        }
        self.call(&self.bot_token, "chat.postMessage", body).await
    }

    async fn post_ephemeral(
        &self,
        channel_id: &str,
        user_id: &str,
        text: &str,
    ) -> Result<(), PolyglotError> {
        let body = json!({
            "channel": channel_id,
            "user": user_id,
            "text": text,
        });
        self.call(&self.bot_token, "chat.postEphemeral", body).await
    }

    async fn post_as_alternate(&self, channel_id: &str, text: &str) -> Result<(), PolyglotError> {
        let token = self
            .user_token
            .as_deref()
            .ok_or_else(|| PolyglotError::Channel("no user_token configured".into()))?;
        let body = json!({ "channel": channel_id, "text": text });
        self.call(token, "chat.postMessage", body).await
    }

    async fn user_profile(&self, user_id: &str) -> Result<UserProfile, PolyglotError> {
        let resp = self
            .client
            .get(format!("{SLACK_BASE_URL}/users.info"))
            .bearer_auth(&self.bot_token)
            .query(&[("user", user_id)])
            .send()
            .await
            .map_err(|e| PolyglotError::Channel(format!("users.info failed: {e}")))?;

        let parsed: UsersInfoResponse = resp
            .json()
            .await
            .map_err(|e| PolyglotError::Channel(format!("users.info parse failed: {e}")))?;

        if !parsed.ok {
            return Err(PolyglotError::Channel(format!(
                "users.info returned error: {}",
                parsed.error.unwrap_or_default()
            )));
        }
        let user = parsed
            .user
            .ok_or_else(|| PolyglotError::Channel("users.info returned no user".into()))?;

        let display_name = user
            .profile
            .as_ref()
            .and_then(|p| p.display_name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or(user.name);
        let avatar_url = user.profile.and_then(|p| p.image_24);

        Ok(UserProfile {
            display_name,
            avatar_url,
        })
    }

    async fn is_channel_accessible(&self, channel_id: &str) -> bool {
        let resp = self
            .client
            .get(format!("{SLACK_BASE_URL}/conversations.info"))
            .bearer_auth(&self.bot_token)
            .query(&[("channel", channel_id)])
            .send()
            .await;

        match resp {
            Ok(r) => match r.json::<ApiResponse>().await {
                Ok(parsed) => parsed.ok,
                Err(_) => false,
            },
            Err(_) => false,
        }
    }
}
