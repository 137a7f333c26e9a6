//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (registration.rs):
//!     add_service → apply options → stable sort by priority (desc)
//!
//! Startup (manager.rs):
//!     Starting → foreground start inline / background start spawned → Running
//!
//! Shutdown (manager.rs):
//!     InShutdown → shutdown in reverse order → drain background (tracker.rs) → Exited
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT or context done → trigger shutdown
//! ```
//!
//! # Design Decisions
//! - Ordered startup: highest priority first, ties in registration order
//! - Ordered shutdown: exact reverse of startup order
//! - No timeout on the background drain; services must honor shutdown

pub mod manager;
pub mod registration;
pub mod signals;
pub mod state;
pub(crate) mod tracker;

pub use manager::{Manager, ManagerOptions};
pub use registration::{with_background, with_priority, Registration, ServiceOption};
pub use signals::Signal;
pub use state::ServiceState;
