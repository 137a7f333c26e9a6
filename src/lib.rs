//! Ordered startup and graceful shutdown of in-process services.
//!
//! # Data Flow
//! ```text
//! Manager::add_service (priority, background)
//!     → Manager::start   (priority order; background services spawned)
//!     → Manager::wait    (SIGINT / SIGTERM / context done)
//!     → Manager::shutdown (reverse order, then drain background tasks)
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod observability;
pub mod service;

pub use config::ManagerConfig;
pub use context::Context;
pub use error::{is_shutting_down, Error, JoinedError, Result, ServiceFailure, ShuttingDown};
pub use lifecycle::{
    with_background, with_priority, Manager, ManagerOptions, Registration, ServiceOption,
    ServiceState, Signal,
};
pub use observability::{Logger, NopLogger, StandardLogger};
pub use service::{new_service, BoxError, FnService, Service};
