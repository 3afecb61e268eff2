//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] stalebot_config::ConfigError),

    /// GitHub client error
    #[error("GitHub error: {0}")]
    GitHub(#[from] stalebot_github::GitHubError),

    /// Lifecycle error
    #[error("{0}")]
    Engine(#[from] stalebot_engine::EngineError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Event payload is not valid JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Event payload lacks something the bot needs
    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Event the bot does not handle
    #[error("Unsupported event: {0}")]
    UnsupportedEvent(String),
}
