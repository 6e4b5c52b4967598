//! Spinner driven by the request-activity counter.

use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::activity::ActivityCounter;

/// Shows a spinner on stderr whenever at least one request is in flight.
pub struct BusyIndicator {
    task: Option<JoinHandle<()>>,
    bar: ProgressBar,
}

impl BusyIndicator {
    /// Follow `activity`. The spinner stays hidden when stderr is not a terminal.
    pub fn start(activity: &ActivityCounter) -> Self {
        let bar = if Term::stderr().is_term() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message("Working...");

        let mut rx = activity.subscribe();
        let spinner = bar.clone();
        let task = tokio::spawn(async move {
            loop {
                let active = *rx.borrow_and_update() > 0;
                if active {
                    spinner.reset();
                    spinner.enable_steady_tick(Duration::from_millis(100));
                } else {
                    spinner.disable_steady_tick();
                    spinner.finish_and_clear();
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        });

        Self {
            task: Some(task),
            bar,
        }
    }

    pub fn finish(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.bar.finish_and_clear();
    }
}
