//! Main scheduler runtime.

use std::sync::Arc;

use nexus_notify::NotifierRegistry;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::book::ReminderBook;
use crate::config::SchedulerConfig;
use crate::error::{Result, SchedulerError};
use crate::event::SchedulerEvent;
use crate::poller::ReminderPoller;

/// Capacity of the event broadcast channel.
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Owns the reminder poller task.
pub struct Scheduler {
    config: SchedulerConfig,
    book: Arc<ReminderBook>,
    notifiers: Arc<NotifierRegistry>,
    events: broadcast::Sender<SchedulerEvent>,
    poller_handle: Option<JoinHandle<()>>,
    shutdown_tx: watch::Sender<bool>,
    started: bool,
}

impl Scheduler {
    /// Create a scheduler over `book` delivering through `notifiers`.
    pub fn new(
        config: SchedulerConfig,
        book: Arc<ReminderBook>,
        notifiers: NotifierRegistry,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (shutdown_tx, _) = watch::channel(false);

        Self {
            config,
            book,
            notifiers: Arc::new(notifiers),
            events,
            poller_handle: None,
            shutdown_tx,
            started: false,
        }
    }

    /// Start polling in a background task.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Err(SchedulerError::AlreadyStarted);
        }

        info!(
            poll_interval_secs = self.config.poll_interval.as_secs(),
            channels = ?self.notifiers.channels(),
            "starting reminder scheduler"
        );

        // Clear a flag left over from a previous shutdown.
        self.shutdown_tx.send_replace(false);

        let mut poller = ReminderPoller::new(
            self.config.clone(),
            Arc::clone(&self.book),
            Arc::clone(&self.notifiers),
            self.events.clone(),
            self.shutdown_tx.subscribe(),
        );

        self.poller_handle = Some(tokio::spawn(async move {
            poller.run().await;
        }));
        self.started = true;

        Ok(())
    }

    /// Stop polling and wait for the task to finish.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.started {
            return Err(SchedulerError::NotStarted);
        }

        info!("shutting down reminder scheduler");

        self.shutdown_tx.send(true).map_err(|e| {
            SchedulerError::Shutdown(format!("failed to send shutdown signal: {}", e))
        })?;

        if let Some(handle) = self.poller_handle.take() {
            debug!("waiting for poller to stop");
            handle
                .await
                .map_err(|e| SchedulerError::Shutdown(format!("poller task panicked: {}", e)))?;
        }

        self.started = false;
        info!("reminder scheduler stopped");

        Ok(())
    }

    /// Subscribe to delivery events.
    pub fn subscribe(&self) -> broadcast::Receiver<SchedulerEvent> {
        self.events.subscribe()
    }

    /// The reminder book being polled.
    pub fn book(&self) -> Arc<ReminderBook> {
        Arc::clone(&self.book)
    }

    /// The registered notifiers.
    pub fn notifiers(&self) -> Arc<NotifierRegistry> {
        Arc::clone(&self.notifiers)
    }

    /// Check if the scheduler has been started.
    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl Drop for Scheduler {
    fn drop(&mut self) {
        if self.started {
            let _ = self.shutdown_tx.send(true);
        }
    }
}
