//! Translation routing for inbound channel messages.
//!
//! One message can produce a channel-visible threaded reply, a set of
//! per-user ephemeral deliveries, or nothing at all. The two branches are
//! independent: a failure in one never suppresses the other.

use super::cache::DetectionCache;
use polyglot_core::{
    error::PolyglotError,
    filter, lang,
    message::{ChannelPost, MessageEvent, UserProfile},
    traits::{DeliverySink, Translator},
};
use polyglot_store::{ChannelPreference, PreferenceStore};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinSet;
use tracing::{debug, warn};

const FAILURE_NOTICE: &str = "\u{26A0}\u{FE0F} Translation failed. Please try again later.";

/// Language pair assumed for channels that enabled translation without
/// naming languages.
pub(crate) const DEFAULT_LANGUAGES: [&str; 2] = ["en", "tr"];

/// Shared routing state. The gateway holds one behind an `Arc`; command
/// handlers borrow the same instance.
pub struct Router {
    pub(crate) translator: Arc<dyn Translator>,
    pub(crate) sink: Arc<dyn DeliverySink>,
    pub(crate) prefs: Arc<RwLock<PreferenceStore>>,
    pub(crate) cache: Mutex<DetectionCache>,
}

impl Router {
    pub fn new(
        translator: Arc<dyn Translator>,
        sink: Arc<dyn DeliverySink>,
        prefs: Arc<RwLock<PreferenceStore>>,
        cache: DetectionCache,
    ) -> Self {
        Self {
            translator,
            sink,
            prefs,
            cache: Mutex::new(cache),
        }
    }

    /// Route one inbound message through the channel and per-user branches.
    pub async fn handle_message(&self, msg: MessageEvent) {
        if !filter::is_eligible(&msg) {
            debug!("skipping ineligible message in {}", msg.channel_id);
            return;
        }

        let (channel_pref, subscribers) = {
            let prefs = self.prefs.read().await;
            (
                prefs.channel(&msg.channel_id).cloned(),
                prefs.subscribers_in(&msg.channel_id, &msg.sender_id),
            )
        };
        let channel_enabled = channel_pref.as_ref().is_some_and(|p| p.enabled);
        if !channel_enabled && subscribers.is_empty() {
            return;
        }

        let detected = match self.detect_cached(&msg.text).await {
            Ok(code) => code,
            Err(e) => {
                warn!("language detection failed in {}: {e}", msg.channel_id);
                if channel_enabled {
                    self.post_thread_notice(&msg, FAILURE_NOTICE).await;
                }
                return;
            }
        };
        debug!("detected '{detected}' in {}", msg.channel_id);

        // One profile fetch serves both branches; a failure degrades
        // attribution to the raw user id.
        let profile = match self.sink.user_profile(&msg.sender_id).await {
            Ok(p) => p,
            Err(e) => {
                debug!("profile lookup for {} failed: {e}", msg.sender_id);
                UserProfile {
                    display_name: msg.sender_id.clone(),
                    avatar_url: None,
                }
            }
        };

        if let Some(pref) = channel_pref.filter(|p| p.enabled) {
            self.channel_branch(&msg, &pref, &detected, &profile).await;
        }
        self.user_fan_out(&msg, &detected, &profile, subscribers).await;
    }

    /// Detect the language of `text`, consulting the cache first.
    pub(crate) async fn detect_cached(&self, text: &str) -> Result<String, PolyglotError> {
        if let Some(code) = self.cache.lock().await.get(text) {
            debug!("detection cache hit: {code}");
            return Ok(code);
        }
        let code = self.translator.detect(text).await?;
        self.cache.lock().await.put(text, &code);
        Ok(code)
    }

    /// Channel-wide translation: one threaded context-block reply in the
    /// language the channel pair says is missing.
    async fn channel_branch(
        &self,
        msg: &MessageEvent,
        pref: &ChannelPreference,
        detected: &str,
        profile: &UserProfile,
    ) {
        let languages = active_or_default(&pref.active_languages);
        let Some(target) = languages.iter().find(|l| l.as_str() != detected) else {
            debug!("no alternate language for '{detected}' in {}", msg.channel_id);
            return;
        };

        match self
            .translator
            .translate(&msg.text, target, Some(detected))
            .await
        {
            Ok(translated) => {
                if filter::normalize(&translated) == filter::normalize(&msg.text) {
                    debug!("identical translation, skipping delivery");
                    return;
                }
                let post = context_block_reply(profile, &translated, thread_anchor(msg));
                if let Err(e) = self.sink.post_channel_message(&msg.channel_id, &post).await {
                    warn!("channel reply in {} failed: {e}", msg.channel_id);
                }
            }
            Err(e) => {
                warn!("channel translation in {} failed: {e}", msg.channel_id);
                self.post_thread_notice(msg, FAILURE_NOTICE).await;
            }
        }
    }

    /// Per-user fan-out: one concurrent translate-and-deliver task per
    /// subscriber, joined to completion. Failures are isolated per task.
    async fn user_fan_out(
        &self,
        msg: &MessageEvent,
        detected: &str,
        profile: &UserProfile,
        subscribers: Vec<(String, String)>,
    ) {
        let mut tasks = JoinSet::new();
        for (user_id, target) in subscribers {
            if target == detected {
                continue;
            }
            let translator = self.translator.clone();
            let sink = self.sink.clone();
            let text = msg.text.clone();
            let channel_id = msg.channel_id.clone();
            let detected = detected.to_string();
            let sender = profile.display_name.clone();

            tasks.spawn(async move {
                let translated = match translator.translate(&text, &target, Some(&detected)).await
                {
                    Ok(t) => t,
                    Err(e) => {
                        warn!("translation to '{target}' for {user_id} failed: {e}");
                        return;
                    }
                };
                if filter::normalize(&translated) == filter::normalize(&text) {
                    return;
                }
                let line = format!("{sender} {} {translated}", lang::flag(&target));
                if let Err(e) = sink.post_ephemeral(&channel_id, &user_id, &line).await {
                    warn!("ephemeral delivery to {user_id} failed: {e}");
                }
            });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(e) = joined {
                warn!("per-user translation task aborted: {e}");
            }
        }
    }

    async fn post_thread_notice(&self, msg: &MessageEvent, text: &str) {
        let post = ChannelPost {
            text: text.to_string(),
            blocks: None,
            thread_ts: Some(thread_anchor(msg).to_string()),
        };
        if let Err(e) = self.sink.post_channel_message(&msg.channel_id, &post).await {
            warn!("failure notice in {} not delivered: {e}", msg.channel_id);
        }
    }
}

/// Replies attach to the existing thread when the message was already in
/// one, otherwise to the message itself.
fn thread_anchor(msg: &MessageEvent) -> &str {
    msg.thread_ts.as_deref().unwrap_or(&msg.ts)
}

pub(crate) fn active_or_default(languages: &[String]) -> Vec<String> {
    if languages.is_empty() {
        DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect()
    } else {
        languages.to_vec()
    }
}

/// Compact context block: sender avatar (when known) plus an attributed
/// translation line. The line starts with the sender name, so the loop
/// marker check matches on the alias inside the text fallback instead.
fn context_block_reply(profile: &UserProfile, translated: &str, thread_ts: &str) -> ChannelPost {
    let mut elements = Vec::new();
    if let Some(ref avatar) = profile.avatar_url {
        elements.push(json!({
            "type": "image",
            "image_url": avatar,
            "alt_text": profile.display_name,
        }));
    }
    let line = format!(
        "{} {} {translated}",
        profile.display_name,
        filter::LOOP_MARKER_ALIAS
    );
    elements.push(json!({ "type": "mrkdwn", "text": line }));

    ChannelPost {
        text: format!("{} {} {translated}", profile.display_name, filter::LOOP_MARKER),
        blocks: Some(json!([{ "type": "context", "elements": elements }])),
        thread_ts: Some(thread_ts.to_string()),
    }
}
