//! Outbound notification channels for Nexus.
//!
//! Reminders are delivered through a [`Notifier`] picked by the reminder's
//! [`Channel`](nexus_models::Channel):
//! - [`TwilioWhatsApp`] posts WhatsApp messages through the Twilio REST API
//! - [`TelegramNotifier`] sends Telegram messages through the bot API
//!
//! Notifiers are collected in a [`NotifierRegistry`] that the reminder
//! poller consults on every delivery.

pub mod error;
pub mod phone;
pub mod registry;
pub mod telegram;
pub mod traits;
pub mod twilio;

pub use error::{NotifyError, Result};
pub use phone::validate_phone;
pub use registry::NotifierRegistry;
pub use telegram::{parse_chat_id, TelegramNotifier};
pub use traits::{Delivery, Notifier};
pub use twilio::{TwilioConfig, TwilioWhatsApp};
