//! Per-user conversation history.

use std::collections::HashMap;

use nexus_models::TelegramMessage;
use nexus_persistence::JsonStore;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::Result;

/// Messages keyed by owning user.
pub type Conversations = HashMap<String, Vec<TelegramMessage>>;

/// Relayed messages grouped by owning user.
pub struct MessageLog {
    conversations: RwLock<Conversations>,
    store: Option<JsonStore<Conversations>>,
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl MessageLog {
    pub fn in_memory() -> Self {
        Self {
            conversations: RwLock::new(HashMap::new()),
            store: None,
        }
    }

    /// Creates a log backed by `store`, loading what it holds.
    pub fn with_store(store: JsonStore<Conversations>) -> Result<Self> {
        let conversations = store.load_or_default()?;
        info!(
            users = conversations.len(),
            path = %store.path().display(),
            "loaded Telegram messages"
        );
        Ok(Self {
            conversations: RwLock::new(conversations),
            store: Some(store),
        })
    }

    fn persist(&self, conversations: &Conversations) -> Result<()> {
        if let Some(store) = &self.store {
            store.save(conversations)?;
        }
        Ok(())
    }

    /// Messages of `user_id`, oldest first.
    pub async fn list(&self, user_id: &str) -> Vec<TelegramMessage> {
        self.conversations
            .read()
            .await
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Appends a message to its owner's conversation.
    ///
    /// Ids must increase within a conversation; a message stamped in the same
    /// millisecond as its predecessor is moved one past it.
    pub async fn append(&self, mut message: TelegramMessage) -> Result<TelegramMessage> {
        let mut conversations = self.conversations.write().await;
        let mut next = conversations.clone();
        let conversation = next.entry(message.user_id.clone()).or_default();

        if let Some(last) = conversation.iter().map(|m| m.id).max() {
            if message.id <= last {
                message.id = last + 1;
            }
        }

        debug!(user_id = %message.user_id, id = message.id, "appending Telegram message");
        conversation.push(message.clone());
        self.commit(&mut conversations, next)?;
        Ok(message)
    }

    /// Replaces the conversation of `user_id`. Returns the stored count.
    pub async fn sync(&self, user_id: &str, messages: Vec<TelegramMessage>) -> Result<usize> {
        let mut conversations = self.conversations.write().await;
        let messages: Vec<TelegramMessage> = messages
            .into_iter()
            .map(|mut m| {
                m.user_id = user_id.to_string();
                m
            })
            .collect();
        let count = messages.len();

        let mut next = conversations.clone();
        if messages.is_empty() {
            next.remove(user_id);
        } else {
            next.insert(user_id.to_string(), messages);
        }

        self.commit(&mut conversations, next)?;
        debug!(user_id, count, "synced Telegram messages");
        Ok(count)
    }

    /// Removes every message of `user_id`. Returns how many were removed.
    pub async fn clear(&self, user_id: &str) -> Result<usize> {
        let mut conversations = self.conversations.write().await;
        let removed = conversations.get(user_id).map_or(0, Vec::len);
        if removed > 0 {
            let mut next = conversations.clone();
            next.remove(user_id);
            self.commit(&mut conversations, next)?;
        }
        Ok(removed)
    }

    /// Deletes the message with `id` from the conversation of `user_id`.
    pub async fn delete(&self, user_id: &str, id: i64) -> Result<bool> {
        let mut conversations = self.conversations.write().await;
        let Some(index) = conversations
            .get(user_id)
            .and_then(|c| c.iter().position(|m| m.id == id))
        else {
            return Ok(false);
        };

        let mut next = conversations.clone();
        if let Some(conversation) = next.get_mut(user_id) {
            conversation.remove(index);
            if conversation.is_empty() {
                next.remove(user_id);
            }
        }
        self.commit(&mut conversations, next)?;
        Ok(true)
    }

    /// Saves `next` and only then makes it the live state.
    fn commit(&self, live: &mut Conversations, next: Conversations) -> Result<()> {
        self.persist(&next)?;
        *live = next;
        Ok(())
    }

    /// Total messages across users.
    pub async fn len(&self) -> usize {
        self.conversations.read().await.values().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_models::Sender;
    use tempfile::tempdir;

    fn message(id: i64, user: &str, text: &str) -> TelegramMessage {
        TelegramMessage::new(Sender::User, "Arun", text, user).with_id(id)
    }

    #[tokio::test]
    async fn test_append_and_list_per_user() {
        let log = MessageLog::in_memory();
        log.append(message(1, "alice", "hi")).await.unwrap();
        log.append(message(2, "bob", "yo")).await.unwrap();

        let alice = log.list("alice").await;
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].msg, "hi");
        assert!(log.list("carol").await.is_empty());
        assert_eq!(log.len().await, 2);
    }

    #[tokio::test]
    async fn test_append_keeps_ids_increasing() {
        let log = MessageLog::in_memory();
        log.append(message(100, "alice", "first")).await.unwrap();
        let second = log.append(message(100, "alice", "second")).await.unwrap();

        assert_eq!(second.id, 101);
        let ids: Vec<i64> = log.list("alice").await.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![100, 101]);
    }

    #[tokio::test]
    async fn test_sync_replaces_and_owns_messages() {
        let log = MessageLog::in_memory();
        log.append(message(1, "alice", "old")).await.unwrap();

        let count = log
            .sync("alice", vec![message(5, "someone-else", "new")])
            .await
            .unwrap();
        assert_eq!(count, 1);

        let alice = log.list("alice").await;
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].msg, "new");
        assert_eq!(alice[0].user_id, "alice");

        assert_eq!(log.sync("alice", Vec::new()).await.unwrap(), 0);
        assert!(log.list("alice").await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_and_delete() {
        let log = MessageLog::in_memory();
        log.append(message(1, "alice", "a")).await.unwrap();
        log.append(message(2, "alice", "b")).await.unwrap();
        log.append(message(3, "bob", "c")).await.unwrap();

        assert!(!log.delete("alice", 3).await.unwrap());
        assert!(log.delete("bob", 3).await.unwrap());
        assert!(!log.delete("bob", 3).await.unwrap());
        assert_eq!(log.clear("alice").await.unwrap(), 2);
        assert_eq!(log.clear("alice").await.unwrap(), 0);
        assert_eq!(log.len().await, 0);
    }

    #[tokio::test]
    async fn test_persistence_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("telegram_messages.json");

        {
            let log = MessageLog::with_store(JsonStore::new(&path)).unwrap();
            log.append(message(1, "alice", "kept")).await.unwrap();
        }

        let log = MessageLog::with_store(JsonStore::new(&path)).unwrap();
        assert_eq!(log.list("alice").await[0].msg, "kept");
    }

    #[tokio::test]
    async fn test_delete_only_touches_owner() {
        let log = MessageLog::in_memory();
        log.append(message(42, "alice", "mine")).await.unwrap();
        log.append(message(42, "bob", "also 42")).await.unwrap();

        assert!(log.delete("bob", 42).await.unwrap());
        assert_eq!(log.list("alice").await[0].msg, "mine");
        assert!(log.list("bob").await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_write_keeps_memory_consistent() {
        let dir = tempdir().unwrap();
        let state_dir = dir.path().join("state");
        std::fs::create_dir(&state_dir).unwrap();

        let log =
            MessageLog::with_store(JsonStore::new(state_dir.join("telegram_messages.json"))).unwrap();
        log.append(message(1, "alice", "kept")).await.unwrap();

        std::fs::remove_dir_all(&state_dir).unwrap();
        std::fs::write(&state_dir, b"not a directory").unwrap();

        assert!(log.append(message(2, "alice", "lost")).await.is_err());
        assert!(log.sync("alice", Vec::new()).await.is_err());
        assert!(log.clear("alice").await.is_err());
        assert!(log.delete("alice", 1).await.is_err());

        let alice = log.list("alice").await;
        assert_eq!(alice.len(), 1);
        assert_eq!(alice[0].msg, "kept");
    }
}
