//! `/autotranslate-me` — personal translation settings.
//!
//! The user record is disabled in place rather than deleted, so per-channel
//! overrides survive an off/on cycle.

use super::CommandContext;
use polyglot_core::{lang, message::CommandInvocation};
use polyglot_store::UserPreference;
use tracing::info;

const USAGE: &str = "Usage: `/autotranslate-me on [language]`, `/autotranslate-me off` \
    or `/autotranslate-me status`\n\
    Examples:\n\
    \u{2022} `/autotranslate-me on` (defaults to English)\n\
    \u{2022} `/autotranslate-me on spanish`";

pub async fn handle(ctx: &CommandContext, invocation: &CommandInvocation) -> Option<String> {
    let mut args = invocation.text.split_whitespace();
    match args.next() {
        Some("on") => {
            let target = lang::resolve(args.next().unwrap_or("english"));
            let mut prefs = ctx.router.prefs.write().await;
            let updated = match prefs.user(&invocation.user_id) {
                Some(existing) => UserPreference {
                    enabled: true,
                    target_language: target.clone(),
                    channels: existing.channels.clone(),
                },
                None => UserPreference {
                    enabled: true,
                    target_language: target.clone(),
                    channels: None,
                },
            };
            prefs.set_user(&invocation.user_id, updated);
            info!(
                "personal auto-translation enabled for {} -> {target}",
                invocation.user_id
            );
            Some(format!(
                "\u{2705} Personal auto-translation enabled. You will receive translations in {} {target}",
                lang::flag(&target)
            ))
        }
        Some("off") => {
            let mut prefs = ctx.router.prefs.write().await;
            match prefs.user(&invocation.user_id) {
                Some(existing) => {
                    let mut updated = existing.clone();
                    updated.enabled = false;
                    prefs.set_user(&invocation.user_id, updated);
                    info!("personal auto-translation disabled for {}", invocation.user_id);
                    Some("\u{274C} Personal auto-translation disabled".to_string())
                }
                None => Some("Personal auto-translation is not set up yet".to_string()),
            }
        }
        Some("status") => {
            let prefs = ctx.router.prefs.read().await;
            let Some(pref) = prefs.user(&invocation.user_id) else {
                return Some("Personal auto-translation is not set up yet".to_string());
            };
            let global = if pref.enabled {
                format!(
                    "enabled, target {} {}",
                    lang::flag(&pref.target_language),
                    pref.target_language
                )
            } else {
                "disabled".to_string()
            };
            let mut status = format!("Personal auto-translation: {global}");
            if let Some(ov) = pref
                .channels
                .as_ref()
                .and_then(|c| c.get(&invocation.channel_id))
            {
                let override_line = match (ov.enabled, ov.target_language.as_deref()) {
                    (Some(false), _) => "disabled here".to_string(),
                    (_, Some(target)) => {
                        format!("target {} {target} here", lang::flag(target))
                    }
                    (Some(true), None) => "enabled here".to_string(),
                    (None, None) => "no effective change here".to_string(),
                };
                status.push_str(&format!("\nThis channel: {override_line}"));
            }
            Some(status)
        }
        _ => Some(USAGE.to_string()),
    }
}
