// Notification queue for surfacing orchestration outcomes to the UI

use crate::store::now_millis;
use serde::{Deserialize, Serialize};

/// How many notifications the queue retains before dropping the oldest
const MAX_NOTIFICATIONS: usize = 20;

/// Severity level of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationLevel {
    Info,
    Warning,
    Error,
}

/// What part of the session produced the notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationCategory {
    Grid,
    Session,
    Transaction,
    Generic,
}

/// A notification with timestamp and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub category: NotificationCategory,
    pub message: String,
    /// Unix timestamp in milliseconds
    pub timestamp: u64,
}

impl Notification {
    /// Create a notification stamped with the current time
    pub fn new(level: NotificationLevel, category: NotificationCategory, message: String) -> Self {
        Self {
            level,
            category,
            message,
            timestamp: now_millis(),
        }
    }

    pub fn info(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Info, category, message)
    }

    pub fn warning(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Warning, category, message)
    }

    pub fn error(category: NotificationCategory, message: String) -> Self {
        Self::new(NotificationLevel::Error, category, message)
    }

    /// True if the notification is younger than `max_age_ms`
    pub fn is_recent(&self, max_age_ms: u64) -> bool {
        now_millis().saturating_sub(self.timestamp) < max_age_ms
    }
}

/// Bounded FIFO queue of notifications
///
/// Notifications are presentation state: they are excluded from
/// transaction snapshots, so a rolled-back transaction keeps its error
/// notification visible.
#[derive(Debug, Default)]
pub struct NotificationStore {
    queue: Vec<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &[Notification] {
        &self.queue
    }

    /// Append a notification, dropping the oldest past the cap
    pub fn push(&mut self, notification: Notification) {
        self.queue.push(notification);
        if self.queue.len() > MAX_NOTIFICATIONS {
            self.queue.remove(0);
        }
    }

    /// Remove the notification at `index`, if present
    pub fn dismiss(&mut self, index: usize) {
        if index < self.queue.len() {
            self.queue.remove(index);
        }
    }

    pub fn clear(&mut self) {
        self.queue.clear();
    }
}
