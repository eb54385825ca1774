//! Shared reminder collection.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use nexus_models::{Reminder, ReminderId, ReminderStatus};
use nexus_persistence::JsonStore;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::{Result, SchedulerError};

/// Reminders selected by a single poll.
#[derive(Debug, Default)]
pub struct DueReminders {
    /// Claimed for delivery, now in `sending`.
    pub deliver: Vec<Reminder>,
    /// Past their grace window, now `missed`.
    pub missed: Vec<Reminder>,
}

impl DueReminders {
    pub fn is_empty(&self) -> bool {
        self.deliver.is_empty() && self.missed.is_empty()
    }
}

/// All reminders known to the process.
///
/// Reminders live in memory; with a store attached every mutation is
/// written through to disk.
pub struct ReminderBook {
    reminders: RwLock<Vec<Reminder>>,
    store: Option<JsonStore<Vec<Reminder>>>,
}

impl ReminderBook {
    /// Creates an empty, memory-only book.
    pub fn in_memory() -> Self {
        Self {
            reminders: RwLock::new(Vec::new()),
            store: None,
        }
    }

    /// Creates a book backed by `store`, loading what it holds.
    ///
    /// Reminders found in `sending` were interrupted mid-delivery. They are
    /// marked failed rather than retried so nothing is ever sent twice.
    pub fn with_store(store: JsonStore<Vec<Reminder>>) -> Result<Self> {
        let mut reminders = store.load_or_default()?;

        for reminder in reminders
            .iter_mut()
            .filter(|r| r.status == ReminderStatus::Sending)
        {
            warn!(id = %reminder.id, "reminder was interrupted during delivery");
            reminder.status = ReminderStatus::Failed;
            reminder.last_error = Some("interrupted during delivery".to_string());
            reminder.triggered_at = Some(Utc::now());
        }

        info!(
            count = reminders.len(),
            path = %store.path().display(),
            "loaded reminders"
        );

        Ok(Self {
            reminders: RwLock::new(reminders),
            store: Some(store),
        })
    }

    fn persist(&self, reminders: &Vec<Reminder>) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(reminders)?;
        }
        Ok(())
    }

    /// Persist from the poller, where a disk failure must not stop delivery.
    fn persist_logged(&self, reminders: &Vec<Reminder>) {
        if let Err(e) = self.persist(reminders) {
            warn!(error = %e, "failed to persist reminders");
        }
    }

    /// Adds a reminder.
    pub async fn add(&self, reminder: Reminder) -> Result<ReminderId> {
        let id = reminder.id.clone();
        let mut reminders = self.reminders.write().await;
        debug!(id = %id, at = %reminder.scheduled_at(), "adding reminder");

        let mut next = reminders.clone();
        next.push(reminder);
        self.persist(&next)?;
        *reminders = next;
        Ok(id)
    }

    /// Gets a reminder by id.
    pub async fn get(&self, id: &ReminderId) -> Option<Reminder> {
        let reminders = self.reminders.read().await;
        reminders.iter().find(|r| &r.id == id).cloned()
    }

    /// Lists reminders ordered by scheduled time.
    pub async fn list(&self) -> Vec<Reminder> {
        let mut list = self.reminders.read().await.clone();
        list.sort_by_key(|r| r.scheduled_at());
        list
    }

    /// Removes a reminder.
    pub async fn remove(&self, id: &ReminderId) -> Result<Reminder> {
        let mut reminders = self.reminders.write().await;
        Self::take(&mut reminders, id, |_| Ok(()), |next| self.persist(next))
    }

    /// Cancels a reminder unless a delivery is in flight.
    ///
    /// The status check and the removal happen under one lock, so a reminder
    /// claimed by the poller can never be reported as cancelled.
    pub async fn cancel(&self, id: &ReminderId) -> Result<Reminder> {
        let mut reminders = self.reminders.write().await;
        Self::take(
            &mut reminders,
            id,
            |reminder| {
                if reminder.status == ReminderStatus::Sending {
                    Err(SchedulerError::InFlight(id.to_string()))
                } else {
                    Ok(())
                }
            },
            |next| self.persist(next),
        )
    }

    /// Removes `id` from `reminders` if `check` allows it, committing only
    /// after `persist` succeeds.
    fn take(
        reminders: &mut Vec<Reminder>,
        id: &ReminderId,
        check: impl FnOnce(&Reminder) -> Result<()>,
        persist: impl FnOnce(&Vec<Reminder>) -> Result<()>,
    ) -> Result<Reminder> {
        let index = reminders
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| SchedulerError::NotFound(id.to_string()))?;
        check(&reminders[index])?;

        let mut next = reminders.clone();
        let removed = next.remove(index);
        persist(&next)?;
        *reminders = next;
        Ok(removed)
    }

    /// Number of reminders still waiting for delivery.
    pub async fn pending_count(&self) -> usize {
        let reminders = self.reminders.read().await;
        reminders
            .iter()
            .filter(|r| r.status == ReminderStatus::Pending)
            .count()
    }

    /// Claims every pending reminder whose minute has arrived.
    ///
    /// Reminders at most `grace` late move to `sending` and are returned for
    /// delivery; later ones become `missed`.
    pub async fn claim_due(&self, now: NaiveDateTime, grace: Duration) -> DueReminders {
        let mut due = DueReminders::default();
        let mut reminders = self.reminders.write().await;

        for reminder in reminders
            .iter_mut()
            .filter(|r| r.status == ReminderStatus::Pending)
        {
            let scheduled = reminder.scheduled_at();
            if scheduled > now {
                continue;
            }

            if now - scheduled <= grace {
                reminder.status = ReminderStatus::Sending;
                reminder.attempts += 1;
                due.deliver.push(reminder.clone());
            } else {
                reminder.status = ReminderStatus::Missed;
                reminder.triggered_at = Some(Utc::now());
                due.missed.push(reminder.clone());
            }
        }

        if !due.is_empty() {
            self.persist_logged(&reminders);
        }

        due
    }

    /// Marks a claimed reminder delivered.
    pub async fn mark_delivered(&self, id: &ReminderId) -> Result<Reminder> {
        self.update(id, |reminder| {
            reminder.status = ReminderStatus::Delivered;
            reminder.last_error = None;
            reminder.triggered_at = Some(Utc::now());
        })
        .await
    }

    /// Records a failed attempt.
    ///
    /// The reminder returns to `pending` while attempts remain, otherwise it
    /// becomes `failed`.
    pub async fn record_failure(
        &self,
        id: &ReminderId,
        error: impl Into<String>,
        max_attempts: u32,
    ) -> Result<Reminder> {
        let error = error.into();
        self.update(id, move |reminder| {
            reminder.last_error = Some(error);
            if reminder.attempts >= max_attempts {
                reminder.status = ReminderStatus::Failed;
                reminder.triggered_at = Some(Utc::now());
            } else {
                reminder.status = ReminderStatus::Pending;
            }
        })
        .await
    }

    /// Marks a claimed reminder failed regardless of attempts left.
    pub async fn mark_failed(&self, id: &ReminderId, error: impl Into<String>) -> Result<Reminder> {
        self.record_failure(id, error, 0).await
    }

    /// Drops finished reminders that finished before `before`.
    pub async fn prune_finished(&self, before: DateTime<Utc>) -> usize {
        let mut reminders = self.reminders.write().await;
        let initial = reminders.len();
        reminders.retain(|r| {
            !(r.is_finished() && r.triggered_at.unwrap_or(r.created_at) < before)
        });
        let pruned = initial - reminders.len();
        if pruned > 0 {
            debug!(pruned, "pruned finished reminders");
            self.persist_logged(&reminders);
        }
        pruned
    }

    async fn update<F>(&self, id: &ReminderId, apply: F) -> Result<Reminder>
    where
        F: FnOnce(&mut Reminder),
    {
        let mut reminders = self.reminders.write().await;
        let reminder = reminders
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| SchedulerError::NotFound(id.to_string()))?;
        apply(reminder);
        let updated = reminder.clone();
        self.persist_logged(&reminders);
        Ok(updated)
    }
}
