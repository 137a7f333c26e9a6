//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Manager lifecycle lines
//!     → Logger (StandardLogger | NopLogger | closure)
//!     → tracing events (target "service_start")
//!     → subscriber installed by logging::init
//! ```
//!
//! # Design Decisions
//! - The lifecycle logger is a side channel; it never affects control flow
//! - Internal diagnostics use `tracing` macros with structured fields

pub mod logging;

pub use logging::{Logger, NopLogger, StandardLogger};
