//! Notification broadcaster.
//!
//! Holds the list of transient user-facing messages. Each notification is
//! removed automatically once its duration elapses, or earlier by `remove`.
//! The list is bounded: past `max_active` entries the oldest is dropped.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

pub const DEFAULT_DURATION: Duration = Duration::from_millis(3000);
pub const DEFAULT_MAX_ACTIVE: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
    Warning,
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotificationKind::Success => write!(f, "success"),
            NotificationKind::Error => write!(f, "error"),
            NotificationKind::Info => write!(f, "info"),
            NotificationKind::Warning => write!(f, "warning"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub message: String,
    pub duration_ms: u64,
}

struct Inner {
    tx: watch::Sender<VecDeque<Notification>>,
    default_duration: Duration,
    max_active: usize,
}

/// Shared handle to the active notification list.
#[derive(Clone)]
pub struct NotificationCenter {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for NotificationCenter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationCenter")
            .field("active", &self.inner.tx.borrow().len())
            .field("max_active", &self.inner.max_active)
            .finish()
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION, DEFAULT_MAX_ACTIVE)
    }
}

impl NotificationCenter {
    pub fn new(default_duration: Duration, max_active: usize) -> Self {
        let (tx, _rx) = watch::channel(VecDeque::new());
        Self {
            inner: Arc::new(Inner {
                tx,
                default_duration,
                max_active,
            }),
        }
    }

    /// Append a notification with the default duration. Returns its id.
    pub fn show(&self, kind: NotificationKind, message: impl Into<String>) -> String {
        self.show_for(kind, message, self.inner.default_duration)
    }

    /// Append a notification removed after `duration`. Returns its id.
    ///
    /// Removal is scheduled on the current Tokio runtime; outside a runtime
    /// the entry stays until removed explicitly or pushed out by the cap.
    pub fn show_for(
        &self,
        kind: NotificationKind,
        message: impl Into<String>,
        duration: Duration,
    ) -> String {
        let notification = Notification {
            id: format!("notification-{}", Uuid::new_v4()),
            kind,
            message: message.into(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        };
        let id = notification.id.clone();
        debug!(%kind, message = %notification.message, "Notification shown");

        let max_active = self.inner.max_active;
        self.inner.tx.send_modify(|list| {
            list.push_back(notification);
            while list.len() > max_active {
                list.pop_front();
            }
        });

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let weak: Weak<Inner> = Arc::downgrade(&self.inner);
            let expired = id.clone();
            handle.spawn(async move {
                tokio::time::sleep(duration).await;
                if let Some(inner) = weak.upgrade() {
                    remove_from(&inner.tx, &expired);
                }
            });
        }
        id
    }

    pub fn success(&self, message: impl Into<String>) -> String {
        self.show(NotificationKind::Success, message)
    }

    pub fn error(&self, message: impl Into<String>) -> String {
        self.show(NotificationKind::Error, message)
    }

    pub fn info(&self, message: impl Into<String>) -> String {
        self.show(NotificationKind::Info, message)
    }

    pub fn warning(&self, message: impl Into<String>) -> String {
        self.show(NotificationKind::Warning, message)
    }

    /// Remove a notification by id. Unknown ids are ignored.
    pub fn remove(&self, id: &str) {
        remove_from(&self.inner.tx, id);
    }

    pub fn clear(&self) {
        self.inner.tx.send_if_modified(|list| {
            let had_any = !list.is_empty();
            list.clear();
            had_any
        });
    }

    /// Snapshot of the active notifications, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        self.inner.tx.borrow().iter().cloned().collect()
    }

    pub fn subscribe(&self) -> watch::Receiver<VecDeque<Notification>> {
        self.inner.tx.subscribe()
    }
}

fn remove_from(tx: &watch::Sender<VecDeque<Notification>>, id: &str) {
    tx.send_if_modified(|list| {
        let before = list.len();
        list.retain(|n| n.id != id);
        list.len() != before
    });
}
