mod commands;
mod gateway;

use clap::{Parser, Subcommand};
use polyglot_channels::slack::SlackChannel;
use polyglot_core::config;
use polyglot_providers::GoogleTranslator;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "polyglot", version, about = "Polyglot — Slack auto-translation bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Check configuration and provider availability.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start => {
            let cfg = config::load(&cli.config)?;

            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.bot.log_level)),
                )
                .init();

            if cfg.slack.app_token.is_empty() || cfg.slack.bot_token.is_empty() {
                anyhow::bail!(
                    "Slack tokens missing. Set slack.app_token (xapp-...) and \
                     slack.bot_token (xoxb-...) in {}.",
                    cli.config
                );
            }

            let translator = build_translator(&cfg)?;
            if !translator.is_available().await {
                anyhow::bail!("translator '{}' is not available", translator.name());
            }

            let channel = Arc::new(SlackChannel::new(cfg.slack.clone()));
            let sink = channel.api();

            println!("{} — starting...", cfg.bot.name);
            let gw = Arc::new(gateway::Gateway::new(&cfg, translator, channel, sink));
            gw.run().await?;
        }
        Commands::Status => {
            let cfg = config::load(&cli.config)?;
            println!("{} — Status Check\n", cfg.bot.name);
            println!("Config: {}", cli.config);
            println!("Preferences: {}", config::shellexpand(&cfg.bot.prefs_path));
            println!();

            let translator = build_translator(&cfg)?;
            println!(
                "  {}: {}",
                translator.name(),
                if translator.is_available().await {
                    "available"
                } else {
                    "not available"
                }
            );
            println!(
                "  slack: app_token {}, bot_token {}, user_token {}",
                if cfg.slack.app_token.is_empty() { "missing" } else { "set" },
                if cfg.slack.bot_token.is_empty() { "missing" } else { "set" },
                if cfg.slack.user_token.is_some() { "set" } else { "not set" },
            );
        }
    }

    Ok(())
}

/// Build the configured translation provider.
fn build_translator(
    cfg: &config::Config,
) -> anyhow::Result<Arc<dyn polyglot_core::traits::Translator>> {
    match cfg.translator.provider.as_str() {
        "google" => {
            if cfg.translator.api_key.is_empty() {
                anyhow::bail!(
                    "translator.api_key is empty. Set a Google Cloud Translation API key."
                );
            }
            Ok(Arc::new(GoogleTranslator::from_config(
                cfg.translator.api_key.clone(),
            )))
        }
        other => anyhow::bail!("unsupported translator: {other}"),
    }
}
