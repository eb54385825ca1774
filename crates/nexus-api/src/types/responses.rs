//! Response DTOs for the API.

use chrono::{DateTime, Utc};
use serde::Serialize;

use nexus_assistant::VoiceOutcome;
use nexus_models::{HistoryCategory, HistoryEntry, Reminder};

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Uptime in seconds.
    pub uptime_seconds: u64,
    /// Reminders not yet delivered.
    pub pending_reminders: usize,
    /// Channels that can deliver reminders.
    pub channels: Vec<String>,
    /// Whether the Telegram relay is configured.
    pub telegram_enabled: bool,
    /// Whether Gemini-backed answers are available.
    pub gemini_enabled: bool,
}

/// A single answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub answer: String,
}

/// Generic success response.
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Reminder created.
#[derive(Debug, Clone, Serialize)]
pub struct SetReminderResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
    /// Local date-time the reminder is due.
    pub scheduled_for: String,
}

/// Reminder list response.
#[derive(Debug, Clone, Serialize)]
pub struct ReminderListResponse {
    pub reminders: Vec<Reminder>,
    pub total: usize,
}

/// Payload echoed back after a relay.
#[derive(Debug, Clone, Serialize)]
pub struct TelegramSendData {
    pub msg: String,
}

/// Telegram relay response.
#[derive(Debug, Clone, Serialize)]
pub struct TelegramSendResponse {
    pub success: bool,
    pub data: TelegramSendData,
}

/// Count-bearing success response.
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    pub success: bool,
    pub message: String,
    pub count: usize,
}

/// History entry with its derived category.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryItem {
    pub id: String,
    pub user_id: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
    pub category: HistoryCategory,
    pub icon: String,
}

impl From<&HistoryEntry> for HistoryItem {
    fn from(entry: &HistoryEntry) -> Self {
        let category = entry.category();
        Self {
            id: entry.id.as_str().to_string(),
            user_id: entry.user_id.clone(),
            action: entry.action.clone(),
            created_at: entry.created_at,
            category,
            icon: category.icon().to_string(),
        }
    }
}

/// Per-category totals of the listed entries.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HistoryCounts {
    pub chatbot: usize,
    pub reminders: usize,
    pub telegram: usize,
}

/// History list response.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryListResponse {
    pub entries: Vec<HistoryItem>,
    pub total: usize,
    pub counts: HistoryCounts,
}

impl HistoryListResponse {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let items: Vec<HistoryItem> = entries.iter().map(HistoryItem::from).collect();
        let mut counts = HistoryCounts::default();
        for item in &items {
            match item.category {
                HistoryCategory::Chatbot => counts.chatbot += 1,
                HistoryCategory::Reminders => counts.reminders += 1,
                HistoryCategory::Telegram => counts.telegram += 1,
                HistoryCategory::Other => {}
            }
        }
        Self {
            total: items.len(),
            entries: items,
            counts,
        }
    }
}

/// Result of processing a voice transcript.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceResponse {
    #[serde(flatten)]
    pub outcome: VoiceOutcome,
    /// Client route to open for a recognised command.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_counts() {
        let entries = vec![
            HistoryEntry::new("u", "Asked AI: \"x\""),
            HistoryEntry::new("u", "Set reminder: \"y\""),
            HistoryEntry::new("u", "Sent Telegram message: \"z\""),
            HistoryEntry::new("u", "Logged in"),
        ];
        let response = HistoryListResponse::from_entries(&entries);

        assert_eq!(response.total, 4);
        assert_eq!(response.counts.chatbot, 1);
        assert_eq!(response.counts.reminders, 1);
        assert_eq!(response.counts.telegram, 1);
        assert_eq!(response.entries[1].icon, "⏰");
    }

    #[test]
    fn test_voice_response_flattens_outcome() {
        let response = VoiceResponse {
            outcome: VoiceOutcome::Wake {
                reply: "Yes, boss".into(),
            },
            path: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["outcome"], "wake");
        assert_eq!(json["reply"], "Yes, boss");
        assert!(json.get("path").is_none());
    }
}
