//! Request-activity counter.
//!
//! A count of in-flight HTTP calls. It drives the global busy indicator and
//! nothing else; concurrent calls are indistinguishable to it.

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct ActivityCounter {
    tx: std::sync::Arc<watch::Sender<usize>>,
}

impl Default for ActivityCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityCounter {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            tx: std::sync::Arc::new(tx),
        }
    }

    pub fn begin(&self) {
        self.tx.send_modify(|count| *count += 1);
    }

    /// Decrement, never going below zero.
    pub fn end(&self) {
        self.tx.send_if_modified(|count| {
            if *count == 0 {
                return false;
            }
            *count -= 1;
            true
        });
    }

    pub fn count(&self) -> usize {
        *self.tx.borrow()
    }

    pub fn is_active(&self) -> bool {
        self.count() > 0
    }

    pub fn reset(&self) {
        self.tx.send_if_modified(|count| std::mem::replace(count, 0) != 0);
    }

    pub fn subscribe(&self) -> watch::Receiver<usize> {
        self.tx.subscribe()
    }

    /// Begin tracking one call; the returned guard ends it when dropped.
    pub fn track(&self) -> ActivityGuard {
        self.begin();
        ActivityGuard {
            counter: self.clone(),
        }
    }
}

/// Ends one tracked call on drop, whether the call succeeded, failed, or was cancelled.
#[must_use = "the call is only tracked while the guard is alive"]
#[derive(Debug)]
pub struct ActivityGuard {
    counter: ActivityCounter,
}

impl Drop for ActivityGuard {
    fn drop(&mut self) {
        self.counter.end();
    }
}
