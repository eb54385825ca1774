//! Error types for the scheduler crate.

use thiserror::Error;

/// Errors that can occur in the scheduler.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Reminder not found.
    #[error("reminder not found: {0}")]
    NotFound(String),

    /// Reminder is being delivered and cannot be changed.
    #[error("reminder is being delivered: {0}")]
    InFlight(String),

    /// Persistence failure.
    #[error("persistence error: {0}")]
    Persistence(#[from] nexus_persistence::PersistenceError),

    /// Scheduler not started.
    #[error("scheduler not started")]
    NotStarted,

    /// Scheduler already started.
    #[error("scheduler already started")]
    AlreadyStarted,

    /// Shutdown error.
    #[error("shutdown error: {0}")]
    Shutdown(String),
}

/// Result type for scheduler operations.
pub type Result<T> = std::result::Result<T, SchedulerError>;
