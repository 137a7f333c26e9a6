//! OS signal handling.
//!
//! # Responsibilities
//! - Subscribe to SIGINT and SIGTERM for the duration of `Manager::wait`
//! - Report which signal arrived
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Listener is scoped: dropping it stops delivery to this waiter
//! - A listener that fails to install is logged and never fires

use std::fmt;
use std::future;

/// Termination signal that ended [`Manager::wait`](crate::Manager::wait).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Interrupt,
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Interrupt => f.write_str("SIGINT"),
            Signal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

#[cfg(unix)]
pub(crate) struct SignalListener {
    interrupt: Option<tokio::signal::unix::Signal>,
    terminate: Option<tokio::signal::unix::Signal>,
}

#[cfg(unix)]
impl SignalListener {
    pub(crate) fn subscribe() -> Self {
        use tokio::signal::unix::{signal, SignalKind};

        Self {
            interrupt: install(Signal::Interrupt, signal(SignalKind::interrupt())),
            terminate: install(Signal::Terminate, signal(SignalKind::terminate())),
        }
    }

    pub(crate) async fn recv(&mut self) -> Signal {
        tokio::select! {
            Some(()) = recv_opt(&mut self.interrupt) => Signal::Interrupt,
            Some(()) = recv_opt(&mut self.terminate) => Signal::Terminate,
            else => future::pending().await,
        }
    }
}

#[cfg(unix)]
fn install(
    kind: Signal,
    result: std::io::Result<tokio::signal::unix::Signal>,
) -> Option<tokio::signal::unix::Signal> {
    match result {
        Ok(listener) => Some(listener),
        Err(e) => {
            tracing::warn!(signal = %kind, error = %e, "Failed to install signal handler");
            None
        }
    }
}

#[cfg(unix)]
async fn recv_opt(listener: &mut Option<tokio::signal::unix::Signal>) -> Option<()> {
    match listener {
        Some(listener) => listener.recv().await,
        None => future::pending().await,
    }
}

#[cfg(not(unix))]
pub(crate) struct SignalListener;

#[cfg(not(unix))]
impl SignalListener {
    pub(crate) fn subscribe() -> Self {
        Self
    }

    pub(crate) async fn recv(&mut self) -> Signal {
        match tokio::signal::ctrl_c().await {
            Ok(()) => Signal::Interrupt,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install Ctrl+C handler");
                future::pending().await
            }
        }
    }
}
