//! Operational notification log.
//!
//! Append-only, in-memory only: the feed is advisory and a restart starting
//! empty is acceptable (recorded in DESIGN.md). Ids derive from the log
//! length; every insertion happens behind the owning lock, so ids stay
//! unique and dense.

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::ticket::TIMESTAMP_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Warning,
    Urgent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: u64,
    pub title: String,
    pub message: String,
    pub level: NotificationLevel,
    pub timestamp: String,
    pub read: bool,
}

#[derive(Debug, Default)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an alert and return the created record.
    pub fn add(&mut self, title: &str, message: &str, level: NotificationLevel) -> Notification {
        let notification = Notification {
            id: self.entries.len() as u64 + 1,
            title: title.to_string(),
            message: message.to_string(),
            level,
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            read: false,
        };
        self.entries.push(notification.clone());
        notification
    }

    /// Every notification, oldest first.
    pub fn list(&self) -> &[Notification] {
        &self.entries
    }

    /// The last `n` notifications, newest first.
    pub fn recent(&self, n: usize) -> Vec<Notification> {
        self.entries.iter().rev().take(n).cloned().collect()
    }

    pub fn unread_count(&self) -> usize {
        self.entries.iter().filter(|n| !n.read).count()
    }

    /// Mark one notification read. Idempotent; `false` when the id is
    /// unknown.
    pub fn mark_read(&mut self, id: u64) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(notification) => {
                notification.read = true;
                true
            }
            None => false,
        }
    }
}
