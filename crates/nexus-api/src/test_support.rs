//! Shared fixtures for handler and router tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use nexus_assistant::{AssistantError, TextGenerator};
use nexus_notify::NotifierRegistry;
use nexus_scheduler::ReminderBook;
use nexus_telegram::MessageLog;

use crate::config::ApiConfig;
use crate::history::HistoryLog;
use crate::state::AppState;

pub(crate) fn make_test_state() -> AppState {
    AppState::new(
        ApiConfig::default(),
        Arc::new(ReminderBook::in_memory()),
        Arc::new(NotifierRegistry::new()),
        Arc::new(HistoryLog::in_memory()),
        Arc::new(MessageLog::in_memory()),
    )
}

/// Generator returning a fixed reply or failing.
pub(crate) struct CannedGenerator {
    reply: Option<String>,
    fail: bool,
    pub prompts: Mutex<Vec<String>>,
}

impl CannedGenerator {
    pub fn new(reply: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.map(str::to_string),
            fail: false,
            prompts: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            reply: None,
            fail: true,
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, prompt: &str) -> nexus_assistant::Result<Option<String>> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail {
            return Err(AssistantError::ModelInvocation("offline".into()));
        }
        Ok(self.reply.clone())
    }
}
