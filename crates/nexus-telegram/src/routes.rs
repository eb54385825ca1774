//! Mapping of inbound Telegram replies to web users.

use std::collections::{HashMap, VecDeque};

/// User assumed for replies that cannot be attributed.
pub const ANONYMOUS_USER: &str = "anonymous";

/// How many relayed message ids are remembered.
const MAX_TRACKED: usize = 1000;

/// Remembers which web user produced each relayed Telegram message.
#[derive(Debug, Default)]
pub struct ReplyRoutes {
    by_message: HashMap<i32, String>,
    order: VecDeque<i32>,
    last_sender: Option<String>,
}

impl ReplyRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that Telegram message `message_id` was sent for `user_id`.
    pub fn remember(&mut self, message_id: i32, user_id: &str) {
        if self.by_message.insert(message_id, user_id.to_string()).is_none() {
            self.order.push_back(message_id);
        }
        while self.order.len() > MAX_TRACKED {
            if let Some(oldest) = self.order.pop_front() {
                self.by_message.remove(&oldest);
            }
        }
        self.last_sender = Some(user_id.to_string());
    }

    /// Owner of an inbound message replying to `reply_to`.
    ///
    /// Falls back to the most recent sender, then to [`ANONYMOUS_USER`].
    pub fn resolve(&self, reply_to: Option<i32>) -> String {
        reply_to
            .and_then(|id| self.by_message.get(&id))
            .or(self.last_sender.as_ref())
            .cloned()
            .unwrap_or_else(|| ANONYMOUS_USER.to_string())
    }

    pub fn tracked(&self) -> usize {
        self.by_message.len()
    }
}
