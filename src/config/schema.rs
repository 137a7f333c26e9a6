//! Configuration schema definitions.

use serde::{Deserialize, Serialize};

/// Root configuration for a [`Manager`](crate::Manager).
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ManagerConfig {
    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Which logger receives lifecycle lines.
    pub lifecycle_logger: LoggerKind,

    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            lifecycle_logger: LoggerKind::Standard,
            filter: "service_start=info".to_string(),
        }
    }
}

/// Stock lifecycle logger implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LoggerKind {
    /// Forward to `tracing`.
    #[default]
    Standard,
    /// Discard.
    Nop,
}
