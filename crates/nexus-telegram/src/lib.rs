//! Telegram relay for Nexus.
//!
//! Web users post messages through [`TelegramRelay::send`]; replies typed in
//! the Telegram chat are attributed back to them by the listener and kept in
//! the [`MessageLog`].

pub mod error;
pub mod message_log;
pub mod relay;
pub mod routes;

pub use error::{RelayError, Result};
pub use message_log::{Conversations, MessageLog};
pub use relay::{
    relay_text, Command, TelegramRelay, BOT_NAME, RELAY_ACK, TELEGRAM_BOT_TOKEN_ENV,
    TELEGRAM_CHAT_ID_ENV,
};
pub use routes::{ReplyRoutes, ANONYMOUS_USER};
