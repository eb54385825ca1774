//! Error types for the Telegram relay.

use nexus_persistence::PersistenceError;
use thiserror::Error;

/// Errors that can occur in the relay.
#[derive(Debug, Error)]
pub enum RelayError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Target chat not provided.
    #[error("Telegram chat not set. Set TELEGRAM_CHAT_ID environment variable.")]
    NoChat,

    /// Target chat is not a numeric id.
    #[error("Invalid Telegram chat id: {0}")]
    InvalidChatId(String),

    /// Bot API request failed.
    #[error("Telegram error: {0}")]
    Telegram(String),

    /// Message history could not be saved.
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

/// Result type for relay operations.
pub type Result<T> = std::result::Result<T, RelayError>;

impl From<teloxide::RequestError> for RelayError {
    fn from(e: teloxide::RequestError) -> Self {
        RelayError::Telegram(e.to_string())
    }
}
