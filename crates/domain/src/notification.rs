//! Operator-visible notifications.

use serde::{Deserialize, Serialize};

use crate::time::Timestamp;

/// Maximum number of notifications retained by the feed.
pub const NOTIFICATION_CAPACITY: usize = 50;

/// Severity of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum NotificationKind {
    Info,
    Warning,
    Alert,
}

/// A single feed entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Epoch milliseconds at insertion, unique and increasing within a feed.
    pub id: i64,
    pub kind: NotificationKind,
    pub message: String,
    pub source: String,
    pub read: bool,
    pub inserted_at: Timestamp,
}
