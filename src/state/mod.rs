//! Entity state containers and their derived views.
//!
//! Each container owns one `watch` channel and is its only writer. Loading is
//! an in-flight count rather than a flag, so overlapping calls on the same
//! container never clear each other's loading state early.

pub mod members;
pub mod projects;
pub mod tasks;
pub mod users;

pub use projects::{ProjectFilters, ProjectSort, ProjectState, ProjectStats, ProjectStore, RoleFilter};
pub use tasks::{
    AssignmentFilter, TaskFilters, TaskGroup, TaskGrouping, TaskSort, TaskState, TaskStats,
    TaskStore,
};

use tokio::sync::watch;

use crate::errors::ApiError;

/// State that carries an in-flight count and a last-error slot.
pub(crate) trait Tracked {
    fn in_flight_mut(&mut self) -> &mut usize;
    fn error_mut(&mut self) -> &mut Option<String>;
}

/// Marks one call in flight for as long as it lives.
///
/// Starting a call clears the last error. Dropping the guard releases the
/// count on every exit path, including `?` and panics.
pub(crate) struct LoadingGuard<'a, S: Tracked> {
    tx: &'a watch::Sender<S>,
}

impl<'a, S: Tracked> LoadingGuard<'a, S> {
    pub(crate) fn start(tx: &'a watch::Sender<S>) -> Self {
        tx.send_modify(|state| {
            *state.in_flight_mut() += 1;
            *state.error_mut() = None;
        });
        Self { tx }
    }

    /// Record a failed call's message: the backend's text, else `fallback`.
    pub(crate) fn fail(&self, err: &ApiError, fallback: &str) {
        let message = err.message_or(fallback);
        self.tx.send_modify(|state| *state.error_mut() = Some(message));
    }
}

impl<S: Tracked> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        self.tx.send_modify(|state| {
            let count = state.in_flight_mut();
            *count = count.saturating_sub(1);
        });
    }
}
