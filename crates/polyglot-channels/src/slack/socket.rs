//! Socket Mode event loop and Channel trait implementation.

use super::types::{Envelope, EventsApiPayload, RawEvent, SlashCommandPayload};
use super::SlackChannel;
use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use polyglot_core::{
    error::PolyglotError,
    message::{CommandInvocation, Event, MessageEvent},
    traits::Channel,
};
use serde_json::json;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};
use tracing::{debug, error, info, warn};

#[async_trait]
impl Channel for SlackChannel {
    fn name(&self) -> &str {
        "slack"
    }

    async fn start(&self) -> Result<mpsc::Receiver<Event>, PolyglotError> {
        if self.config.app_token.is_empty() {
            return Err(PolyglotError::Config(
                "slack app_token is empty, Socket Mode needs an app-level token".into(),
            ));
        }

        let (tx, rx) = mpsc::channel(64);
        let api = self.api.clone();
        let app_token = self.config.app_token.clone();

        info!("Slack channel starting Socket Mode...");

        tokio::spawn(async move {
            let mut backoff_secs: u64 = 1;

            loop {
                let ws_url = match api.connections_open(&app_token).await {
                    Ok(url) => url,
                    Err(e) => {
                        error!("slack connections.open error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                let mut ws = match connect_async(ws_url.as_str()).await {
                    Ok((ws, _)) => ws,
                    Err(e) => {
                        error!("slack websocket connect error (retry in {backoff_secs}s): {e}");
                        tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
                        backoff_secs = (backoff_secs * 2).min(60);
                        continue;
                    }
                };

                // Successful connect -- reset backoff.
                backoff_secs = 1;

                while let Some(frame) = ws.next().await {
                    let text = match frame {
                        Ok(WsMessage::Text(t)) => t,
                        Ok(WsMessage::Ping(payload)) => {
                            let _ = ws.send(WsMessage::Pong(payload)).await;
                            continue;
                        }
                        Ok(WsMessage::Close(_)) => break,
                        Ok(_) => continue,
                        Err(e) => {
                            warn!("slack websocket read error: {e}");
                            break;
                        }
                    };

                    let envelope: Envelope = match serde_json::from_str(&text) {
                        Ok(env) => env,
                        Err(e) => {
                            warn!("slack envelope parse error: {e}");
                            continue;
                        }
                    };

                    // Ack first; Slack re-delivers unacked envelopes.
                    if let Some(ref id) = envelope.envelope_id {
                        let ack = json!({ "envelope_id": id }).to_string();
                        if let Err(e) = ws.send(WsMessage::Text(ack)).await {
                            warn!("slack ack failed: {e}");
                            break;
                        }
                    }

                    match envelope.kind.as_str() {
                        "hello" => info!("slack socket connected"),
                        "disconnect" => {
                            info!("slack requested reconnect");
                            break;
                        }
                        "events_api" => {
                            let Some(payload) = envelope.payload else {
                                continue;
                            };
                            let parsed: EventsApiPayload = match serde_json::from_value(payload) {
                                Ok(p) => p,
                                Err(e) => {
                                    debug!("skipping events_api payload: {e}");
                                    continue;
                                }
                            };
                            if let Some(event) = map_message_event(parsed.event) {
                                if tx.send(Event::Message(event)).await.is_err() {
                                    info!("slack channel receiver dropped, stopping socket loop");
                                    return;
                                }
                            }
                        }
                        "slash_commands" => {
                            let Some(payload) = envelope.payload else {
                                continue;
                            };
                            let parsed: SlashCommandPayload = match serde_json::from_value(payload)
                            {
                                Ok(p) => p,
                                Err(e) => {
                                    debug!("skipping slash_commands payload: {e}");
                                    continue;
                                }
                            };
                            let invocation = CommandInvocation {
                                command: parsed.command,
                                channel_id: parsed.channel_id,
                                user_id: parsed.user_id,
                                text: parsed.text,
                            };
                            if tx.send(Event::Command(invocation)).await.is_err() {
                                info!("slack channel receiver dropped, stopping socket loop");
                                return;
                            }
                        }
                        other => debug!("ignoring slack envelope type '{other}'"),
                    }
                }

                warn!("slack socket closed, reconnecting in {backoff_secs}s");
                tokio::time::sleep(std::time::Duration::from_secs(backoff_secs)).await;
            }
        });

        Ok(rx)
    }

    async fn stop(&self) -> Result<(), PolyglotError> {
        info!("Slack channel stopped");
        Ok(())
    }
}

/// Map a raw Events API event to a `MessageEvent`. Non-message events and
/// events missing routing fields are dropped.
pub(crate) fn map_message_event(raw: RawEvent) -> Option<MessageEvent> {
    if raw.kind != "message" {
        return None;
    }
    let channel_id = raw.channel?;
    let ts = raw.ts?;
    Some(MessageEvent {
        channel_id,
        sender_id: raw.user.unwrap_or_default(),
        text: raw.text.unwrap_or_default(),
        ts,
        thread_ts: raw.thread_ts,
        subtype: raw.subtype,
        bot_id: raw.bot_id,
        received_at: chrono::Utc::now(),
    })
}
