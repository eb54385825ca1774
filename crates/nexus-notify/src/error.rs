//! Error types for notification delivery.

use thiserror::Error;

/// Errors that can occur while delivering a notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// Recipient address is malformed for the channel.
    #[error("invalid recipient: {0}")]
    InvalidRecipient(String),

    /// The provider rejected the request.
    #[error("provider returned {status}: {body}")]
    Rejected { status: u16, body: String },

    /// No answer in time. The message may or may not have gone out.
    #[error("delivery timed out: {0}")]
    Timeout(String),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(String),

    /// Telegram bot API failure.
    #[error("Telegram error: {0}")]
    Telegram(String),

    /// No notifier is registered for the channel.
    #[error("no notifier registered for channel: {0}")]
    NoNotifier(String),
}

/// Result type for notification operations.
pub type Result<T> = std::result::Result<T, NotifyError>;

impl NotifyError {
    /// Whether the provider may have accepted the message despite the error.
    pub fn delivery_unknown(&self) -> bool {
        matches!(self, NotifyError::Timeout(_))
    }
}

impl From<reqwest::Error> for NotifyError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            NotifyError::Timeout(e.to_string())
        } else {
            NotifyError::Http(e.to_string())
        }
    }
}

impl From<teloxide::RequestError> for NotifyError {
    fn from(e: teloxide::RequestError) -> Self {
        NotifyError::Telegram(e.to_string())
    }
}
