//! Slash commands: channel and personal preference management plus one-shot
//! translation.

mod autotranslate;
mod autotranslate_me;
mod translate;


use crate::gateway::Router;
use polyglot_core::message::CommandInvocation;
use std::sync::Arc;
use tracing::{debug, warn};

/// Recognized slash commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// `/autotranslate` — channel-wide settings.
    Autotranslate,
    /// `/autotranslate-me` — personal settings.
    AutotranslateMe,
    /// `/translate` — one-shot translation posted to the channel.
    Translate,
}

impl Command {
    /// Parse a command name (with leading slash). Unknown names are ignored
    /// upstream.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "/autotranslate" => Some(Self::Autotranslate),
            "/autotranslate-me" => Some(Self::AutotranslateMe),
            "/translate" => Some(Self::Translate),
            _ => None,
        }
    }
}

/// Everything a command handler can touch.
pub struct CommandContext {
    pub router: Arc<Router>,
}

/// Dispatch one slash-command invocation. The handler's reply, if any, is
/// posted ephemerally to the invoking user.
pub async fn handle(ctx: &CommandContext, invocation: &CommandInvocation) {
    let Some(command) = Command::parse(&invocation.command) else {
        debug!("ignoring unknown command '{}'", invocation.command);
        return;
    };

    let reply = match command {
        Command::Autotranslate => autotranslate::handle(ctx, invocation).await,
        Command::AutotranslateMe => autotranslate_me::handle(ctx, invocation).await,
        Command::Translate => translate::handle(ctx, invocation).await,
    };

    if let Some(text) = reply {
        if let Err(e) = ctx
            .router
            .sink
            .post_ephemeral(&invocation.channel_id, &invocation.user_id, &text)
            .await
        {
            warn!(
                "ephemeral reply to {} in {} failed: {e}",
                invocation.user_id, invocation.channel_id
            );
        }
    }
}
