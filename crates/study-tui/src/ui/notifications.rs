// Status-line feedback with auto-dismiss

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl NotificationLevel {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationLevel::Info => "ℹ",
            NotificationLevel::Success => "✓",
            NotificationLevel::Warning => "⚠",
            NotificationLevel::Error => "✗",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
    pub duration: Duration,
    pub shown_at: Instant,
}

impl Notification {
    fn new(message: impl Into<String>, level: NotificationLevel, duration: Duration) -> Self {
        Self {
            message: message.into(),
            level,
            duration,
            shown_at: Instant::now(),
        }
    }

    /// Create an info notification (3 second duration)
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Info, Duration::from_secs(3))
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Success, Duration::from_secs(3))
    }

    /// Create a warning notification (4 second duration)
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Warning, Duration::from_secs(4))
    }

    /// Create an error notification (5 second duration)
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, NotificationLevel::Error, Duration::from_secs(5))
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.shown_at) >= self.duration
    }
}
