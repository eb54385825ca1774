//! Telegram delivery through the bot API.

use async_trait::async_trait;
use nexus_models::Channel;
use teloxide::prelude::*;
use teloxide::types::ChatId;
use tracing::info;

use crate::error::{NotifyError, Result};
use crate::traits::{Delivery, Notifier};

/// Sends messages to Telegram chats as the configured bot.
#[derive(Clone)]
pub struct TelegramNotifier {
    bot: Bot,
}

impl TelegramNotifier {
    /// Creates a notifier for the bot with the given token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }

    /// Creates a notifier sharing an existing bot handle.
    pub fn from_bot(bot: Bot) -> Self {
        Self { bot }
    }
}

/// Parse a Telegram chat id recipient.
pub fn parse_chat_id(recipient: &str) -> Result<ChatId> {
    recipient
        .trim()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| {
            NotifyError::InvalidRecipient(format!(
                "Telegram chat id must be numeric, got {}",
                recipient
            ))
        })
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn channel(&self) -> Channel {
        Channel::Telegram
    }

    async fn send(&self, recipient: &str, body: &str) -> Result<Delivery> {
        let chat_id = parse_chat_id(recipient)?;
        let sent = self.bot.send_message(chat_id, body).await?;

        info!(chat_id = %chat_id, message_id = sent.id.0, "Telegram message sent");

        Ok(Delivery {
            channel: Channel::Telegram,
            provider_id: Some(sent.id.0.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_id() {
        assert_eq!(parse_chat_id("123456").unwrap(), ChatId(123456));
        assert_eq!(parse_chat_id(" -1001234567890 ").unwrap(), ChatId(-1001234567890));
        assert!(matches!(
            parse_chat_id("@channel"),
            Err(NotifyError::InvalidRecipient(_))
        ));
    }

    #[test]
    fn test_channel() {
        let notifier = TelegramNotifier::new("123:abc");
        assert_eq!(notifier.channel(), Channel::Telegram);
    }
}
