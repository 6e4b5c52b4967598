//! Prints notifications to stderr as they are posted.

use console::style;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tokio::task::JoinHandle;

use super::icons;
use crate::notify::{Notification, NotificationCenter, NotificationKind};

/// Format one notification for the terminal.
pub fn render(notification: &Notification) -> String {
    let icon = icons::for_kind(notification.kind);
    let message = match notification.kind {
        NotificationKind::Success => style(&notification.message).green(),
        NotificationKind::Error => style(&notification.message).red(),
        NotificationKind::Warning => style(&notification.message).yellow(),
        NotificationKind::Info => style(&notification.message).cyan(),
    };
    format!("{icon}{message}")
}

/// Watches a [`NotificationCenter`] and prints each notification once.
///
/// Notifications expire on their own, so the printer follows the list while
/// commands run and [`finish`](Self::finish) flushes whatever is still pending.
pub struct NotificationPrinter {
    center: NotificationCenter,
    printed: Arc<Mutex<HashSet<String>>>,
    task: Option<JoinHandle<()>>,
}

impl NotificationPrinter {
    /// Start following `center`. Must be called inside a Tokio runtime.
    pub fn start(center: NotificationCenter) -> Self {
        let printed = Arc::new(Mutex::new(HashSet::new()));
        let mut rx = center.subscribe();
        let seen = printed.clone();
        let task = tokio::spawn(async move {
            loop {
                let batch: Vec<Notification> = rx.borrow_and_update().iter().cloned().collect();
                print_unseen(&seen, &batch);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });
        Self {
            center,
            printed,
            task: Some(task),
        }
    }

    /// Stop following and print anything not yet shown.
    pub fn finish(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        print_unseen(&self.printed, &self.center.active());
    }
}

fn print_unseen(printed: &Mutex<HashSet<String>>, batch: &[Notification]) {
    let Ok(mut printed) = printed.lock() else {
        return;
    };
    for notification in batch {
        if printed.insert(notification.id.clone()) {
            eprintln!("{}", render(notification));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_keeps_message_text() {
        let note = Notification {
            id: "n1".into(),
            kind: NotificationKind::Error,
            message: "Server error".into(),
            duration_ms: 3000,
        };
        assert!(console::strip_ansi_codes(&render(&note)).contains("Server error"));
    }

    #[test]
    fn each_notification_prints_once() {
        let printed = Mutex::new(HashSet::new());
        let note = Notification {
            id: "n1".into(),
            kind: NotificationKind::Info,
            message: "hi".into(),
            duration_ms: 3000,
        };
        print_unseen(&printed, std::slice::from_ref(&note));
        print_unseen(&printed, std::slice::from_ref(&note));
        assert_eq!(printed.lock().unwrap().len(), 1);
    }
}
