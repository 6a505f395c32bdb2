//! `/translate` — one-shot translation posted to the channel under the
//! configured user identity.

use super::CommandContext;
use crate::gateway::active_or_default;
use polyglot_core::{filter, message::CommandInvocation};
use tracing::warn;

const USAGE: &str = "Usage: `/translate <message>`\nExample: `/translate Hello everyone!`";
const EMOJI_ONLY: &str = "\u{23ED}\u{FE0F} Cannot translate emoji-only messages";
const FAILED: &str = "\u{26A0}\u{FE0F} Translation failed. Please try again later.";

pub async fn handle(ctx: &CommandContext, invocation: &CommandInvocation) -> Option<String> {
    let text = invocation.text.trim();
    if text.is_empty() {
        return Some(USAGE.to_string());
    }
    if filter::is_emoji_only(text) {
        return Some(EMOJI_ONLY.to_string());
    }

    let detected = match ctx.router.detect_cached(text).await {
        Ok(code) => code,
        Err(e) => {
            warn!("detection for /translate in {} failed: {e}", invocation.channel_id);
            return Some(FAILED.to_string());
        }
    };

    let languages = {
        let prefs = ctx.router.prefs.read().await;
        let active = prefs
            .channel(&invocation.channel_id)
            .map(|p| p.active_languages.clone())
            .unwrap_or_default();
        active_or_default(&active)
    };
    let Some(target) = languages.iter().find(|l| l.as_str() != detected) else {
        return Some(format!(
            "\u{2705} Text is already in the target language(s): {}",
            languages.join(", ")
        ));
    };

    let translated = match ctx
        .router
        .translator
        .translate(text, target, Some(&detected))
        .await
    {
        Ok(t) => t,
        Err(e) => {
            warn!("/translate in {} failed: {e}", invocation.channel_id);
            return Some(FAILED.to_string());
        }
    };

    // The marker prefix keeps the posted translation out of the router.
    let line = format!("{} {translated}", filter::LOOP_MARKER);
    match ctx
        .router
        .sink
        .post_as_alternate(&invocation.channel_id, &line)
        .await
    {
        Ok(()) => None,
        Err(e) => {
            warn!("posting /translate result to {} failed: {e}", invocation.channel_id);
            Some(format!(
                "\u{26A0}\u{FE0F} Could not post to channel. Translation: {} {translated}",
                filter::LOOP_MARKER
            ))
        }
    }
}
