//! Gateway: the event loop connecting the Slack channel, the translation
//! provider, and the preference store.

mod cache;
mod router;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::DetectionCache;
pub use router::Router;
pub(crate) use router::active_or_default;

use crate::commands::{self, CommandContext};
use polyglot_core::{
    config::{shellexpand, Config},
    message::Event,
    traits::{Channel, DeliverySink, Translator},
};
use polyglot_store::PreferenceStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub struct Gateway {
    channel: Arc<dyn Channel>,
    router: Arc<Router>,
}

impl Gateway {
    pub fn new(
        config: &Config,
        translator: Arc<dyn Translator>,
        channel: Arc<dyn Channel>,
        sink: Arc<dyn DeliverySink>,
    ) -> Self {
        let prefs = PreferenceStore::load(shellexpand(&config.bot.prefs_path));
        let router = Router::new(
            translator,
            sink,
            Arc::new(RwLock::new(prefs)),
            DetectionCache::new(&config.cache),
        );
        Self {
            channel,
            router: Arc::new(router),
        }
    }

    /// Run the main event loop until the event stream ends or ctrl-c arrives.
    pub async fn run(self: Arc<Self>) -> anyhow::Result<()> {
        info!(
            "Polyglot gateway running | provider: {} | channel: {}",
            self.router.translator.name(),
            self.channel.name()
        );

        let mut rx = self
            .channel
            .start()
            .await
            .map_err(|e| anyhow::anyhow!("failed to start channel: {e}"))?;

        loop {
            tokio::select! {
                maybe = rx.recv() => match maybe {
                    Some(event) => {
                        let router = self.router.clone();
                        tokio::spawn(async move {
                            dispatch(router, event).await;
                        });
                    }
                    None => {
                        warn!("event stream closed");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal");
                    break;
                }
            }
        }

        if let Err(e) = self.channel.stop().await {
            warn!("failed to stop channel: {e}");
        }
        info!("Shutdown complete.");
        Ok(())
    }
}

async fn dispatch(router: Arc<Router>, event: Event) {
    match event {
        Event::Message(msg) => router.handle_message(msg).await,
        Event::Command(invocation) => {
            let ctx = CommandContext { router };
            commands::handle(&ctx, &invocation).await;
        }
    }
}
