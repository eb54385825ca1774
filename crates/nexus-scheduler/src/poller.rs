//! Reminder poller delivering due reminders.

use std::sync::Arc;

use chrono::{Local, NaiveDateTime, Utc};
use nexus_models::Reminder;
use nexus_notify::{NotifierRegistry, NotifyError};
use tokio::sync::{broadcast, watch};
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

use crate::book::ReminderBook;
use crate::config::SchedulerConfig;
use crate::event::SchedulerEvent;

/// Counts from a single poll.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PollReport {
    pub delivered: usize,
    pub failed: usize,
    pub missed: usize,
}

/// Polls the reminder book on a fixed interval.
pub struct ReminderPoller {
    config: SchedulerConfig,
    book: Arc<ReminderBook>,
    notifiers: Arc<NotifierRegistry>,
    events: broadcast::Sender<SchedulerEvent>,
    shutdown: watch::Receiver<bool>,
}

impl ReminderPoller {
    /// Creates a new poller.
    pub fn new(
        config: SchedulerConfig,
        book: Arc<ReminderBook>,
        notifiers: Arc<NotifierRegistry>,
        events: broadcast::Sender<SchedulerEvent>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            book,
            notifiers,
            events,
            shutdown,
        }
    }

    /// Run the polling loop until shutdown signal.
    pub async fn run(&mut self) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        debug!(
            poll_interval_ms = self.config.poll_interval.as_millis(),
            "starting reminder poller"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.poll_once(Local::now().naive_local()).await;
                }
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        debug!("poller received shutdown signal");
                        break;
                    }
                }
            }
        }

        debug!("reminder poller stopped");
    }

    /// Deliver everything due at local time `now`.
    pub async fn poll_once(&self, now: NaiveDateTime) -> PollReport {
        let mut report = PollReport::default();

        let due = self.book.claim_due(now, self.config.grace_chrono()).await;
        trace!(
            deliver = due.deliver.len(),
            missed = due.missed.len(),
            "polled reminders"
        );

        for reminder in due.missed {
            warn!(
                id = %reminder.id,
                scheduled = %reminder.scheduled_at(),
                "reminder missed its grace window"
            );
            report.missed += 1;
            self.emit(SchedulerEvent::Missed { reminder });
        }

        for reminder in due.deliver {
            if self.deliver(&reminder).await {
                report.delivered += 1;
            } else {
                report.failed += 1;
            }
        }

        let cutoff = Utc::now() - self.config.retention_chrono();
        self.book.prune_finished(cutoff).await;

        report
    }

    async fn deliver(&self, reminder: &Reminder) -> bool {
        let result = match self.notifiers.get(reminder.channel) {
            Some(notifier) => {
                let body = reminder.message_body();
                let send = notifier.send(&reminder.recipient, &body);
                match timeout(self.config.send_timeout, send).await {
                    Ok(result) => result,
                    Err(_) => Err(NotifyError::Timeout(format!(
                        "no answer from {} within {:?}",
                        reminder.channel, self.config.send_timeout
                    ))),
                }
            }
            None => Err(NotifyError::NoNotifier(reminder.channel.to_string())),
        };

        match result {
            Ok(delivery) => {
                info!(
                    id = %reminder.id,
                    channel = %reminder.channel,
                    provider_id = ?delivery.provider_id,
                    "reminder delivered"
                );
                match self.book.mark_delivered(&reminder.id).await {
                    Ok(updated) => self.emit(SchedulerEvent::Delivered { reminder: updated }),
                    // Cancelled while the send was in flight.
                    Err(e) => debug!(id = %reminder.id, error = %e, "delivered reminder vanished"),
                }
                true
            }
            Err(e) => {
                warn!(
                    id = %reminder.id,
                    channel = %reminder.channel,
                    attempt = reminder.attempts,
                    error = %e,
                    "reminder delivery failed"
                );
                // The message may already be out; resending could duplicate it.
                let recorded = if e.delivery_unknown() {
                    self.book.mark_failed(&reminder.id, e.to_string()).await
                } else {
                    self.book
                        .record_failure(&reminder.id, e.to_string(), self.config.max_attempts)
                        .await
                };
                match recorded {
                    Ok(updated) => {
                        let will_retry = !updated.is_finished();
                        self.emit(SchedulerEvent::Failed {
                            reminder: updated,
                            error: e.to_string(),
                            will_retry,
                        });
                    }
                    Err(err) => debug!(id = %reminder.id, error = %err, "failed reminder vanished"),
                }
                false
            }
        }
    }

    fn emit(&self, event: SchedulerEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
