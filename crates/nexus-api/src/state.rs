//! Application state shared across handlers.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::warn;

use nexus_assistant::{ChatService, CollegeAdvisor, HospitalKnowledge, VoiceGate};
use nexus_notify::NotifierRegistry;
use nexus_scheduler::ReminderBook;
use nexus_telegram::{MessageLog, TelegramRelay};

use crate::config::ApiConfig;
use crate::history::HistoryLog;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// API configuration.
    pub config: Arc<ApiConfig>,
    /// Scheduled reminders.
    pub reminders: Arc<ReminderBook>,
    /// Channels the scheduler can deliver through.
    pub notifiers: Arc<NotifierRegistry>,
    /// Per-user activity history.
    pub history: Arc<HistoryLog>,
    /// Per-user Telegram conversations.
    pub messages: Arc<MessageLog>,
    /// Hospital FAQ.
    pub hospital: Arc<HospitalKnowledge>,
    /// Gemini chat (None without an API key).
    pub chat: Option<ChatService>,
    /// College document Q&A (None without an API key).
    pub college: Option<CollegeAdvisor>,
    /// Telegram relay (None without a bot token and chat).
    pub relay: Option<Arc<TelegramRelay>>,
    /// Voice gates keyed by user.
    pub voice_gates: Arc<Mutex<HashMap<String, VoiceGate>>>,
}

impl AppState {
    /// Creates state with the stores every deployment has.
    pub fn new(
        config: ApiConfig,
        reminders: Arc<ReminderBook>,
        notifiers: Arc<NotifierRegistry>,
        history: Arc<HistoryLog>,
        messages: Arc<MessageLog>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            reminders,
            notifiers,
            history,
            messages,
            hospital: Arc::new(HospitalKnowledge::default()),
            chat: None,
            college: None,
            relay: None,
            voice_gates: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub fn with_hospital(mut self, hospital: HospitalKnowledge) -> Self {
        self.hospital = Arc::new(hospital);
        self
    }

    pub fn with_chat(mut self, chat: ChatService) -> Self {
        self.chat = Some(chat);
        self
    }

    pub fn with_college(mut self, college: CollegeAdvisor) -> Self {
        self.college = Some(college);
        self
    }

    pub fn with_relay(mut self, relay: Arc<TelegramRelay>) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Records a history action when the request named a user.
    ///
    /// History is best effort; a failed write never fails the request.
    pub async fn note(&self, user_id: Option<&str>, action: impl Into<String>) {
        let Some(user_id) = user_id.map(str::trim).filter(|u| !u.is_empty()) else {
            return;
        };
        if let Err(e) = self.history.record(user_id, action).await {
            warn!(error = %e, "failed to record history");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::make_test_state;
    use nexus_models::HistoryFilter;

    #[tokio::test]
    async fn test_note_requires_user() {
        let state = make_test_state();
        state.note(None, "ignored").await;
        state.note(Some("  "), "ignored").await;
        state.note(Some("alice"), "kept").await;

        let entries = state.history.list("alice", HistoryFilter::All, None).await;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].action, "kept");
    }

    #[test]
    fn test_optional_services_default_off() {
        let state = make_test_state();
        assert!(state.chat.is_none());
        assert!(state.college.is_none());
        assert!(state.relay.is_none());
        assert!(state.hospital.is_empty());
    }
}
