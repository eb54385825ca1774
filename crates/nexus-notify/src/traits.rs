//! The notifier trait implemented by every delivery channel.

use async_trait::async_trait;
use nexus_models::Channel;

use crate::error::Result;

/// Outcome of a successful delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    /// Channel the message went out on.
    pub channel: Channel,
    /// Provider-side identifier (Twilio message SID, Telegram message id).
    pub provider_id: Option<String>,
}

/// A channel able to deliver a text message to a recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// The channel this notifier serves.
    fn channel(&self) -> Channel;

    /// Deliver `body` to `recipient`.
    ///
    /// The recipient format is channel specific: an E.164 phone number for
    /// WhatsApp, a numeric chat id for Telegram.
    async fn send(&self, recipient: &str, body: &str) -> Result<Delivery>;
}
