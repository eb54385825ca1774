//! Activity history store.

use nexus_models::{HistoryEntry, HistoryFilter, HistoryId};
use nexus_persistence::{JsonStore, Result};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Characters of quoted text kept in an action line.
pub const QUOTE_LIMIT: usize = 50;

/// Quote `text` after `prefix`, shortening it to `limit` characters.
///
/// `quote_action("Sent Telegram message", "hi", 50)` gives
/// `Sent Telegram message: "hi"`.
pub fn quote_action(prefix: &str, text: &str, limit: usize) -> String {
    let text = text.trim();
    let mut quoted: String = text.chars().take(limit).collect();
    if text.chars().count() > limit {
        quoted.push_str("...");
    }
    format!("{}: \"{}\"", prefix, quoted)
}

/// Recorded user actions, newest last in storage.
pub struct HistoryLog {
    entries: RwLock<Vec<HistoryEntry>>,
    store: Option<JsonStore<Vec<HistoryEntry>>>,
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl HistoryLog {
    pub fn in_memory() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
            store: None,
        }
    }

    /// Creates a log backed by `store`, loading what it holds.
    pub fn with_store(store: JsonStore<Vec<HistoryEntry>>) -> Result<Self> {
        let entries = store.load_or_default()?;
        info!(count = entries.len(), path = %store.path().display(), "loaded history");
        Ok(Self {
            entries: RwLock::new(entries),
            store: Some(store),
        })
    }

    fn persist(&self, entries: &Vec<HistoryEntry>) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(entries)?;
        }
        Ok(())
    }

    /// Records an action for `user_id`.
    pub async fn record(
        &self,
        user_id: impl Into<String>,
        action: impl Into<String>,
    ) -> Result<HistoryEntry> {
        let entry = HistoryEntry::new(user_id, action);
        debug!(user_id = %entry.user_id, action = %entry.action, "recording history");

        let mut entries = self.entries.write().await;
        let mut next = entries.clone();
        next.push(entry.clone());
        self.persist(&next)?;
        *entries = next;
        Ok(entry)
    }

    /// Entries of `user_id` passing `filter` and `search`, newest first.
    pub async fn list(
        &self,
        user_id: &str,
        filter: HistoryFilter,
        search: Option<&str>,
    ) -> Vec<HistoryEntry> {
        let entries = self.entries.read().await;
        let mut matching: Vec<HistoryEntry> = entries
            .iter()
            .filter(|e| e.user_id == user_id && filter.matches(e, search))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        matching
    }

    /// Removes every entry of `user_id`. Returns how many were removed.
    pub async fn clear(&self, user_id: &str) -> Result<usize> {
        let mut entries = self.entries.write().await;
        let next: Vec<HistoryEntry> = entries
            .iter()
            .filter(|e| e.user_id != user_id)
            .cloned()
            .collect();
        let removed = entries.len() - next.len();
        if removed > 0 {
            self.persist(&next)?;
            *entries = next;
        }
        Ok(removed)
    }

    /// Deletes one entry.
    pub async fn delete(&self, id: &HistoryId) -> Result<bool> {
        let mut entries = self.entries.write().await;
        let Some(index) = entries.iter().position(|e| &e.id == id) else {
            return Ok(false);
        };
        let mut next = entries.clone();
        next.remove(index);
        self.persist(&next)?;
        *entries = next;
        Ok(true)
    }
}
