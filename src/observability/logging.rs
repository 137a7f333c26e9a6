//! Structured logging.
//!
//! # Responsibilities
//! - Define the pluggable lifecycle `Logger`
//! - Forward lifecycle lines to `tracing`
//! - Initialize the process-wide subscriber
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Log level configurable via config and `RUST_LOG`

use std::fmt;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Sink for lifecycle trace lines.
pub trait Logger: Send + Sync {
    fn info(&self, args: fmt::Arguments<'_>);
}

/// Forwards every line to `tracing::info!`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardLogger;

impl Logger for StandardLogger {
    fn info(&self, args: fmt::Arguments<'_>) {
        tracing::info!(target: "service_start", "{}", args);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopLogger;

impl Logger for NopLogger {
    fn info(&self, _args: fmt::Arguments<'_>) {}
}

impl<F> Logger for F
where
    F: Fn(fmt::Arguments<'_>) + Send + Sync,
{
    fn info(&self, args: fmt::Arguments<'_>) {
        self(args)
    }
}

/// Install a global subscriber with an env filter and a fmt layer.
///
/// `RUST_LOG` takes precedence over `default_filter`. Fails if a global
/// subscriber is already set or the filter does not parse.
pub fn init(default_filter: &str) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()?;
    Ok(())
}

/// Install the global subscriber using the configured filter.
pub fn init_from_config(
    config: &LoggingConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init(&config.filter)
}
