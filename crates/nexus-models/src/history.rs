//! Per-user activity history.
//!
//! Every interaction worth showing back to a user (questions asked,
//! reminders set, Telegram messages sent) is recorded as a free-text
//! action. Categories are derived from the action text, not stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::ids::HistoryId;

/// A recorded user action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub user_id: String,
    pub action: String,
    pub created_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Creates an entry stamped now.
    pub fn new(user_id: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            id: HistoryId::new(),
            user_id: user_id.into(),
            action: action.into(),
            created_at: Utc::now(),
        }
    }

    /// Category derived from the action text.
    pub fn category(&self) -> HistoryCategory {
        HistoryCategory::categorize(&self.action)
    }
}

/// Coarse grouping of history entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryCategory {
    Chatbot,
    Reminders,
    Telegram,
    Other,
}

impl HistoryCategory {
    /// Categorizes an action by keyword.
    ///
    /// Chatbot keywords win over reminder keywords, which win over Telegram.
    /// `ai` only counts as a whole word so that e.g. "failed" does not match.
    pub fn categorize(action: &str) -> Self {
        let lower = action.to_lowercase();

        let mentions_ai = lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| word == "ai");

        if mentions_ai
            || lower.contains("health")
            || lower.contains("asked")
            || lower.contains("received")
        {
            HistoryCategory::Chatbot
        } else if lower.contains("reminder") || lower.contains("alarm") {
            HistoryCategory::Reminders
        } else if lower.contains("telegram") {
            HistoryCategory::Telegram
        } else {
            HistoryCategory::Other
        }
    }

    /// Icon shown next to entries of this category.
    pub fn icon(&self) -> &'static str {
        match self {
            HistoryCategory::Chatbot => "🤖",
            HistoryCategory::Reminders => "⏰",
            HistoryCategory::Telegram => "✈️",
            HistoryCategory::Other => "📝",
        }
    }
}

/// Category selector for history listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryFilter {
    #[default]
    All,
    Chatbot,
    Reminders,
    Telegram,
}

impl HistoryFilter {
    /// Whether an entry passes this filter and the (case-insensitive) search term.
    pub fn matches(&self, entry: &HistoryEntry, search: Option<&str>) -> bool {
        let category_ok = match self {
            HistoryFilter::All => true,
            HistoryFilter::Chatbot => entry.category() == HistoryCategory::Chatbot,
            HistoryFilter::Reminders => entry.category() == HistoryCategory::Reminders,
            HistoryFilter::Telegram => entry.category() == HistoryCategory::Telegram,
        };

        let search_ok = match search.map(str::trim) {
            Some(term) if !term.is_empty() => entry
                .action
                .to_lowercase()
                .contains(&term.to_lowercase()),
            _ => true,
        };

        category_ok && search_ok
    }
}

impl FromStr for HistoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "all" => Ok(HistoryFilter::All),
            "chatbot" => Ok(HistoryFilter::Chatbot),
            "reminders" => Ok(HistoryFilter::Reminders),
            "telegram" => Ok(HistoryFilter::Telegram),
            other => Err(format!("unknown history filter: {}", other)),
        }
    }
}
