use thiserror::Error;

/// Top-level error type for Polyglot.
#[derive(Debug, Error)]
pub enum PolyglotError {
    /// Error from the translation provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// Error from the messaging channel (Slack transport or Web API).
    #[error("channel error: {0}")]
    Channel(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Preference storage error.
    #[error("storage error: {0}")]
    Storage(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
