use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::PolyglotError;

/// Top-level Polyglot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,
    #[serde(default)]
    pub slack: SlackConfig,
    #[serde(default)]
    pub translator: TranslatorConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// General bot settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Path to the durable preference file (JSON).
    #[serde(default = "default_prefs_path")]
    pub prefs_path: String,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            log_level: default_log_level(),
            prefs_path: default_prefs_path(),
        }
    }
}

/// Slack tokens and connection settings.
///
/// Socket Mode needs an app-level token (`xapp-...`) for the websocket and a
/// bot token (`xoxb-...`) for the Web API. The optional user token
/// (`xoxp-...`) lets `/translate` post under a real user identity.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SlackConfig {
    #[serde(default)]
    pub app_token: String,
    #[serde(default)]
    pub bot_token: String,
    #[serde(default)]
    pub user_token: Option<String>,
}

/// Translation provider config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslatorConfig {
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default)]
    pub api_key: String,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_key: String::new(),
        }
    }
}

/// Detection cache tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_cache_ttl(),
            capacity: default_cache_capacity(),
        }
    }
}

// --- Default value functions ---

fn default_name() -> String {
    "Polyglot".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_prefs_path() -> String {
    "~/.polyglot/prefs.json".to_string()
}
fn default_provider() -> String {
    "google".to_string()
}
fn default_cache_ttl() -> u64 {
    60
}
fn default_cache_capacity() -> usize {
    500
}

/// Expand `~` to home directory.
pub fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return format!("{}/{rest}", home.to_string_lossy());
        }
    }
    path.to_string()
}

/// Load configuration from a TOML file.
///
/// Falls back to defaults if the file does not exist.
pub fn load(path: &str) -> Result<Config, PolyglotError> {
    let path = Path::new(path);
    if !path.exists() {
        tracing::info!("Config file not found at {}, using defaults", path.display());
        return Ok(Config {
            bot: BotConfig::default(),
            slack: SlackConfig::default(),
            translator: TranslatorConfig::default(),
            cache: CacheConfig::default(),
        });
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| PolyglotError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| PolyglotError::Config(format!("failed to parse config: {}", e)))?;

    Ok(config)
}
