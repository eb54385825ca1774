//! REST API for the Nexus assistant.
//!
//! This crate exposes the backend to the web client:
//! - Hospital FAQ, college document Q&A and general chat
//! - Reminder scheduling (WhatsApp or Telegram delivery)
//! - Telegram relay and per-user conversation storage
//! - Activity history and voice command gating
//!
//! # Example
//!
//! ```ignore
//! use nexus_api::{serve, ApiConfig, AppState, HistoryLog};
//! use nexus_notify::NotifierRegistry;
//! use nexus_scheduler::ReminderBook;
//! use nexus_telegram::MessageLog;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(
//!         config.clone(),
//!         Arc::new(ReminderBook::in_memory()),
//!         Arc::new(NotifierRegistry::new()),
//!         Arc::new(HistoryLog::in_memory()),
//!         Arc::new(MessageLog::in_memory()),
//!     );
//!
//!     serve(config, state, async { let _ = tokio::signal::ctrl_c().await; }).await?;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod history;
pub mod router;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::{parse_origins, ApiConfig, DEFAULT_PORT};
pub use error::{ApiError, Result};
pub use history::{quote_action, HistoryLog, QUOTE_LIMIT};
pub use router::{create_router, serve};
pub use state::AppState;
