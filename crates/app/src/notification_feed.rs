//! In-process notification feed: bounded, most recent first.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use ecohub_domain::notification::{NOTIFICATION_CAPACITY, Notification, NotificationKind};
use ecohub_domain::time::{now, now_millis};

/// Bounded log of operator-visible events.
///
/// New entries go to the head. Once the feed holds `capacity` entries, each
/// insertion evicts the oldest one.
pub struct NotificationFeed {
    inner: Mutex<FeedInner>,
    capacity: usize,
}

struct FeedInner {
    entries: VecDeque<Notification>,
    last_id: i64,
}

impl Default for NotificationFeed {
    fn default() -> Self {
        Self::new(NOTIFICATION_CAPACITY)
    }
}

impl NotificationFeed {
    /// Create an empty feed retaining at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FeedInner {
                entries: VecDeque::with_capacity(capacity),
                last_id: 0,
            }),
            capacity: capacity.max(1),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FeedInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a notification at the head of the feed and return it.
    pub fn push(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        source: impl Into<String>,
    ) -> Notification {
        let mut inner = self.lock();
        let id = now_millis().max(inner.last_id + 1);
        inner.last_id = id;

        let notification = Notification {
            id,
            kind,
            message: message.into(),
            source: source.into(),
            read: false,
            inserted_at: now(),
        };
        tracing::debug!(id, kind = ?notification.kind, message = %notification.message, "notification added");

        inner.entries.push_front(notification.clone());
        inner.entries.truncate(self.capacity);
        notification
    }

    /// Snapshot of the feed, newest first.
    #[must_use]
    pub fn list(&self) -> Vec<Notification> {
        self.lock().entries.iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
