//! Reminder types for Nexus.
//!
//! A reminder is a user-submitted record checked on every poll cycle
//! against the current wall-clock time and delivered once over its channel.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ids::ReminderId;

/// Delivery channel for a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// WhatsApp message through Twilio.
    #[default]
    Whatsapp,
    /// Telegram message through the bot API.
    Telegram,
}

impl Channel {
    /// Returns the wire name of the channel.
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Whatsapp => "whatsapp",
            Channel::Telegram => "telegram",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" => Ok(Channel::Whatsapp),
            "telegram" => Ok(Channel::Telegram),
            other => Err(format!("unknown channel: {}", other)),
        }
    }
}

/// Lifecycle state of a reminder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    /// Waiting for its scheduled minute.
    #[default]
    Pending,
    /// Claimed by the poller, delivery in flight.
    Sending,
    /// Delivered successfully.
    Delivered,
    /// Delivery failed and attempts are exhausted.
    Failed,
    /// The grace window passed before the poller saw it.
    Missed,
}

impl ReminderStatus {
    /// Whether no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ReminderStatus::Delivered | ReminderStatus::Failed | ReminderStatus::Missed
        )
    }
}

impl FromStr for ReminderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(ReminderStatus::Pending),
            "sending" => Ok(ReminderStatus::Sending),
            "delivered" => Ok(ReminderStatus::Delivered),
            "failed" => Ok(ReminderStatus::Failed),
            "missed" => Ok(ReminderStatus::Missed),
            other => Err(format!("unknown reminder status: {}", other)),
        }
    }
}

/// A scheduled reminder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    /// Unique identifier.
    pub id: ReminderId,

    /// Optional display name of the person who set it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Optional owner, used to attribute history entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,

    /// Delivery channel.
    pub channel: Channel,

    /// E.164 phone number for WhatsApp, chat id for Telegram.
    pub recipient: String,

    /// Local calendar date.
    pub date: NaiveDate,

    /// Local wall-clock time, minute precision.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,

    /// What to remind about.
    pub reason: String,

    /// Current lifecycle state.
    #[serde(default)]
    pub status: ReminderStatus,

    /// Delivery attempts made so far.
    #[serde(default)]
    pub attempts: u32,

    /// Last delivery error, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,

    /// When the reminder was created.
    pub created_at: DateTime<Utc>,

    /// When the reminder reached a terminal state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub triggered_at: Option<DateTime<Utc>>,
}

impl Reminder {
    /// Creates a pending reminder. Seconds are dropped from `time`.
    pub fn new(
        channel: Channel,
        recipient: impl Into<String>,
        date: NaiveDate,
        time: NaiveTime,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: ReminderId::new(),
            name: None,
            user_id: None,
            channel,
            recipient: recipient.into(),
            date,
            time: truncate_to_minute(time),
            reason: reason.into(),
            status: ReminderStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
            triggered_at: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the owning user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// The local date-time this reminder is due.
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Whether the reminder has reached a terminal state.
    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    /// Body of the outgoing notification.
    pub fn message_body(&self) -> String {
        format!("🔔 Reminder: {}", self.reason)
    }

    /// Spoken form used by the voice reminder, in 12-hour time.
    pub fn spoken_text(&self) -> String {
        let (is_pm, hour) = self.time.hour12();
        format!(
            "Boss, you told me to remind you at {}:{:02} {} about {}.",
            hour,
            self.time.minute(),
            if is_pm { "PM" } else { "AM" },
            self.reason
        )
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Serializes times as `HH:MM`, the format clients submit.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&s, FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&s, "%H:%M:%S"))
            .map_err(serde::de::Error::custom)
    }
}
