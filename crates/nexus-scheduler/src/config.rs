//! Scheduler configuration.

use std::time::Duration;

/// Configuration for the reminder scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// How often to check for due reminders.
    pub poll_interval: Duration,
    /// How late a reminder may still be delivered after its minute.
    pub grace: Duration,
    /// Delivery attempts before a reminder is marked failed.
    pub max_attempts: u32,
    /// How long finished reminders are kept for listing.
    pub retention: Duration,
    /// Limit for a single notifier send.
    pub send_timeout: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(30),
            grace: Duration::from_secs(5 * 60),
            max_attempts: 3,
            retention: Duration::from_secs(24 * 60 * 60),
            send_timeout: Duration::from_secs(30),
        }
    }
}

impl SchedulerConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the grace window.
    pub fn with_grace(mut self, grace: Duration) -> Self {
        self.grace = grace;
        self
    }

    /// Sets the maximum delivery attempts. Zero is treated as one.
    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max.max(1);
        self
    }

    /// Sets the retention of finished reminders.
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }

    /// Sets the limit for a single notifier send.
    pub fn with_send_timeout(mut self, timeout: Duration) -> Self {
        self.send_timeout = timeout;
        self
    }

    /// Grace window as a chrono duration.
    pub(crate) fn grace_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.grace).unwrap_or_else(|_| chrono::Duration::zero())
    }

    /// Retention as a chrono duration.
    pub(crate) fn retention_chrono(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.retention).unwrap_or_else(|_| chrono::Duration::days(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SchedulerConfig::default();

        assert_eq!(config.poll_interval, Duration::from_secs(30));
        assert_eq!(config.grace, Duration::from_secs(300));
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.retention, Duration::from_secs(86_400));
        assert_eq!(config.send_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_config_builder() {
        let config = SchedulerConfig::new()
            .with_poll_interval(Duration::from_millis(100))
            .with_grace(Duration::from_secs(60))
            .with_max_attempts(0)
            .with_retention(Duration::from_secs(10))
            .with_send_timeout(Duration::from_secs(2));

        assert_eq!(config.poll_interval, Duration::from_millis(100));
        assert_eq!(config.grace_chrono(), chrono::Duration::seconds(60));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.retention_chrono(), chrono::Duration::seconds(10));
        assert_eq!(config.send_timeout, Duration::from_secs(2));
    }
}
