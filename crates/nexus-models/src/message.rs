//! Messages relayed between the web client and Telegram.

use chrono::{Local, Utc};
use serde::{Deserialize, Serialize};

/// Who authored a relayed message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    /// The web user.
    User,
    /// The bot or a Telegram participant answering through it.
    Bot,
}

/// A single entry of a user's Telegram conversation.
///
/// The field names match what browser clients already sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelegramMessage {
    /// Millisecond timestamp used as identifier.
    pub id: i64,
    /// Author side.
    pub sender: Sender,
    /// Display name.
    pub name: String,
    /// Message text.
    pub msg: String,
    /// Human readable local time.
    pub timestamp: String,
    /// Owning user.
    pub user_id: String,
}

impl TelegramMessage {
    /// Creates a message stamped with the current time.
    pub fn new(
        sender: Sender,
        name: impl Into<String>,
        msg: impl Into<String>,
        user_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Utc::now().timestamp_millis(),
            sender,
            name: name.into(),
            msg: msg.into(),
            timestamp: Local::now().format("%-I:%M:%S %p").to_string(),
            user_id: user_id.into(),
        }
    }

    /// Overrides the identifier.
    pub fn with_id(mut self, id: i64) -> Self {
        self.id = id;
        self
    }
}
