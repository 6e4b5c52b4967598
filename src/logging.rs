//! Tracing subscriber setup.

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingSection;

/// Environment variable holding a `tracing` filter directive.
pub const LOG_ENV: &str = "TASKDECK_LOG";

/// Build the filter: `TASKDECK_LOG` wins, then `--verbose`, then the configured level.
pub fn filter_for(logging: &LoggingSection, verbose: bool) -> Result<EnvFilter> {
    if let Ok(directive) = std::env::var(LOG_ENV)
        && !directive.is_empty()
    {
        return EnvFilter::try_new(&directive)
            .with_context(|| format!("Invalid {LOG_ENV} directive '{directive}'"));
    }
    let level = if verbose { "debug" } else { logging.level.as_str() };
    EnvFilter::try_new(level).with_context(|| format!("Invalid logging.level '{level}'"))
}

/// Install the global subscriber. Output goes to stderr.
pub fn init(logging: &LoggingSection, verbose: bool) -> Result<()> {
    let filter = filter_for(logging, verbose)?;

    let installed = if logging.json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.context("Failed to install tracing subscriber")
}
