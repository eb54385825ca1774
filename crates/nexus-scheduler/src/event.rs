//! Events emitted by the scheduler.

use nexus_models::Reminder;

/// Outcome notifications broadcast to subscribers.
#[derive(Debug, Clone)]
pub enum SchedulerEvent {
    /// The reminder was delivered.
    Delivered { reminder: Reminder },
    /// A delivery attempt failed.
    Failed {
        reminder: Reminder,
        error: String,
        will_retry: bool,
    },
    /// The reminder was found after its grace window and will not be sent.
    Missed { reminder: Reminder },
}

impl SchedulerEvent {
    /// The reminder this event is about.
    pub fn reminder(&self) -> &Reminder {
        match self {
            SchedulerEvent::Delivered { reminder }
            | SchedulerEvent::Failed { reminder, .. }
            | SchedulerEvent::Missed { reminder } => reminder,
        }
    }

    /// One-line description suitable for activity history.
    pub fn describe(&self) -> String {
        match self {
            SchedulerEvent::Delivered { reminder } => format!(
                "Reminder delivered via {}: {}",
                reminder.channel, reminder.reason
            ),
            SchedulerEvent::Failed {
                reminder,
                will_retry,
                ..
            } => {
                if *will_retry {
                    format!("Reminder delivery failed, retrying: {}", reminder.reason)
                } else {
                    format!("Reminder delivery failed: {}", reminder.reason)
                }
            }
            SchedulerEvent::Missed { reminder } => {
                format!("Reminder missed: {}", reminder.reason)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};
    use nexus_models::Channel;

    fn reminder() -> Reminder {
        Reminder::new(
            Channel::Telegram,
            "42",
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            "standup",
        )
    }

    #[test]
    fn test_describe() {
        let delivered = SchedulerEvent::Delivered { reminder: reminder() };
        assert_eq!(delivered.describe(), "Reminder delivered via telegram: standup");

        let failed = SchedulerEvent::Failed {
            reminder: reminder(),
            error: "boom".into(),
            will_retry: true,
        };
        assert!(failed.describe().contains("retrying"));
        assert_eq!(failed.reminder().reason, "standup");

        let missed = SchedulerEvent::Missed { reminder: reminder() };
        assert_eq!(missed.describe(), "Reminder missed: standup");
    }
}
