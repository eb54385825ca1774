//! Reminder scheduling for Nexus.
//!
//! - `ReminderBook` - shared collection of reminders with optional persistence
//! - `ReminderPoller` - fixed-interval loop delivering due reminders
//! - `Scheduler` - main entry point owning the poller task
//!
//! # Example
//!
//! ```ignore
//! use nexus_scheduler::{ReminderBook, Scheduler, SchedulerConfig};
//! use nexus_notify::{NotifierRegistry, TwilioConfig, TwilioWhatsApp};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let notifiers = NotifierRegistry::new()
//!         .with(Arc::new(TwilioWhatsApp::new(TwilioConfig::from_env().unwrap())));
//!     let book = Arc::new(ReminderBook::in_memory());
//!
//!     let mut scheduler = Scheduler::new(SchedulerConfig::default(), book, notifiers);
//!     let mut events = scheduler.subscribe();
//!     scheduler.start()?;
//!
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("{:?}", event);
//!         }
//!     });
//!
//!     tokio::signal::ctrl_c().await?;
//!     scheduler.shutdown().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Delivery guarantees
//!
//! A reminder is claimed (moved to `sending`) before its notifier is called,
//! so overlapping polls never deliver it twice, and a delivered reminder is
//! terminal. Failed sends go back to `pending` and are retried on later
//! ticks until `max_attempts` is reached or the grace window closes.

pub mod book;
pub mod config;
pub mod error;
pub mod event;
pub mod poller;
pub mod scheduler;

pub use book::{DueReminders, ReminderBook};
pub use config::SchedulerConfig;
pub use error::{Result, SchedulerError};
pub use event::SchedulerEvent;
pub use poller::{PollReport, ReminderPoller};
pub use scheduler::Scheduler;
