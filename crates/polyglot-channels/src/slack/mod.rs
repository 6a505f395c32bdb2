//! Slack channel via Socket Mode.
//!
//! Events arrive over a websocket obtained from `apps.connections.open`;
//! everything outbound goes through the Web API.
//! Docs: <https://api.slack.com/apis/socket-mode>

mod api;
mod socket;
pub(crate) mod types;


pub use api::SlackApi;

use polyglot_core::config::SlackConfig;
use std::sync::Arc;

/// Slack channel using Socket Mode for events and the Web API for delivery.
pub struct SlackChannel {
    config: SlackConfig,
    api: Arc<SlackApi>,
}

impl SlackChannel {
    /// Create a new Slack channel from config.
    pub fn new(config: SlackConfig) -> Self {
        let api = Arc::new(SlackApi::new(
            config.bot_token.clone(),
            config.user_token.clone(),
        ));
        Self { config, api }
    }

    /// Shared Web API handle. The gateway uses it as its delivery sink.
    pub fn api(&self) -> Arc<SlackApi> {
        self.api.clone()
    }
}
