//! Request DTOs for the API.
//!
//! Fields are optional where clients may omit them; handlers report missing
//! values with the messages clients already display.

use serde::Deserialize;

use nexus_models::TelegramMessage;

/// Hospital question.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    pub question: Option<String>,
    pub user_id: Option<String>,
}

/// College document question.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CollegeAskRequest {
    pub query: Option<String>,
    pub user_id: Option<String>,
}

/// Free-form chat prompt.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatRequest {
    pub text: Option<String>,
    pub user_id: Option<String>,
}

/// Create reminder request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetReminderRequest {
    /// WhatsApp number in E.164 form.
    pub phone: Option<String>,
    /// Telegram chat id.
    pub chat_id: Option<String>,
    /// `whatsapp` or `telegram`; inferred from the recipient when absent.
    pub channel: Option<String>,
    /// `YYYY-MM-DD`.
    pub date: Option<String>,
    /// `HH:MM` or `h:mm AM|PM`.
    pub time: Option<String>,
    pub reason: Option<String>,
    pub name: Option<String>,
    pub user_id: Option<String>,
}

/// Reminder list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReminderListQuery {
    /// Filter by status.
    pub status: Option<String>,
    /// Filter by owner.
    pub user_id: Option<String>,
}

/// Relay a message to Telegram.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TelegramSendRequest {
    pub name: Option<String>,
    pub msg: Option<String>,
    pub user_id: Option<String>,
}

/// Selects one user's data.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

/// Replace a user's Telegram conversation.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramSyncRequest {
    pub user_id: Option<String>,
    #[serde(default)]
    pub messages: Vec<TelegramMessage>,
}

/// History list query parameters.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryQuery {
    pub user_id: Option<String>,
    /// `all`, `chatbot`, `reminders` or `telegram`.
    pub filter: Option<String>,
    pub search: Option<String>,
}

/// Record a history action.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddHistoryRequest {
    pub user_id: Option<String>,
    pub action: Option<String>,
}

/// A speech transcript from the client.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceRequest {
    pub user_id: Option<String>,
    pub transcript: Option<String>,
}

/// Trimmed, non-empty value of an optional field.
pub(crate) fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_reminder_request_accepts_minimal_body() {
        let req: SetReminderRequest = serde_json::from_str(
            r#"{"phone": "+919876543210", "date": "2030-01-01", "time": "09:30", "reason": "meds"}"#,
        )
        .unwrap();
        assert_eq!(req.phone.as_deref(), Some("+919876543210"));
        assert!(req.channel.is_none());
    }

    #[test]
    fn test_sync_request_defaults_messages() {
        let req: TelegramSyncRequest = serde_json::from_str(r#"{"user_id": "u1"}"#).unwrap();
        assert!(req.messages.is_empty());
    }

    #[test]
    fn test_present() {
        assert_eq!(present(&Some("  x ".into())), Some("x"));
        assert_eq!(present(&Some("   ".into())), None);
        assert_eq!(present(&None), None);
    }
}
