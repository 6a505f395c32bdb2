//! `/autotranslate` — enable or disable channel-wide translation.

use super::CommandContext;
use crate::gateway::active_or_default;
use polyglot_core::{lang, message::CommandInvocation};
use polyglot_store::ChannelPreference;
use tracing::info;

const USAGE: &str = "Usage: `/autotranslate on [languages...]` or `/autotranslate off`\n\
    Examples:\n\
    \u{2022} `/autotranslate on` (defaults to English + Turkish)\n\
    \u{2022} `/autotranslate on english spanish`\n\
    \u{2022} `/autotranslate on turkish french german`";

const NOT_A_MEMBER: &str = "\u{26A0}\u{FE0F} Bot needs to be added to this channel first. \
    Please invite the bot to the channel before enabling auto-translation.";

pub async fn handle(ctx: &CommandContext, invocation: &CommandInvocation) -> Option<String> {
    let mut args = invocation.text.split_whitespace();
    match args.next() {
        Some("on") => {
            // The bot cannot post replies into channels it is not in, so
            // refuse to enable rather than fail silently later.
            if !ctx
                .router
                .sink
                .is_channel_accessible(&invocation.channel_id)
                .await
            {
                return Some(NOT_A_MEMBER.to_string());
            }

            let languages: Vec<String> = args.map(lang::resolve).collect();
            let languages = active_or_default(&languages);
            ctx.router.prefs.write().await.set_channel(
                &invocation.channel_id,
                ChannelPreference {
                    enabled: true,
                    active_languages: languages.clone(),
                },
            );
            info!(
                "auto-translation enabled in {} for [{}]",
                invocation.channel_id,
                languages.join(", ")
            );
            Some(format!(
                "\u{2705} Auto-translation enabled for this channel. Active languages: {}",
                languages.join(", ")
            ))
        }
        Some("off") => {
            ctx.router
                .prefs
                .write()
                .await
                .delete_channel(&invocation.channel_id);
            info!("auto-translation disabled in {}", invocation.channel_id);
            Some("\u{274C} Auto-translation disabled for this channel".to_string())
        }
        _ => Some(USAGE.to_string()),
    }
}
