//! Core data models for Nexus.
//!
//! This crate provides the data types shared across the Nexus backend:
//! reminders and their delivery lifecycle, relayed Telegram messages,
//! per-user activity history, and the hospital Q&A dataset records.

pub mod history;
pub mod ids;
pub mod message;
pub mod qa;
pub mod reminder;

pub use history::{HistoryCategory, HistoryEntry, HistoryFilter};
pub use ids::{HistoryId, ReminderId};
pub use message::{Sender, TelegramMessage};
pub use qa::QaPair;
pub use reminder::{Channel, Reminder, ReminderStatus};
