//! Manager lifecycle state.
//!
//! # State Transitions
//! ```text
//! Exited → Starting: start()
//! Starting → Running: every foreground start succeeded
//! Starting | Running → InShutdown: shutdown()
//! InShutdown → Exited: every service stopped, background tasks drained
//! ```

use std::fmt;
use tokio::sync::watch;

/// Lifecycle state of a [`Manager`](crate::Manager), not of any single service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceState {
    #[default]
    Exited,
    Starting,
    Running,
    InShutdown,
    /// Declared for callers; the manager never enters it on its own.
    Error,
}

impl ServiceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceState::Exited => "exited",
            ServiceState::Starting => "starting",
            ServiceState::Running => "running",
            ServiceState::InShutdown => "in_shutdown",
            ServiceState::Error => "error",
        }
    }
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State cell readable while start/shutdown run.
///
/// Backed by a watch channel so callers can wait for a given state.
#[derive(Debug)]
pub(crate) struct StateCell(watch::Sender<ServiceState>);

impl StateCell {
    pub(crate) fn get(&self) -> ServiceState {
        *self.0.borrow()
    }

    pub(crate) fn set(&self, state: ServiceState) {
        self.0.send_replace(state);
    }

    /// Move to `to` if the current state is one of `from`.
    ///
    /// Returns the state observed before the attempt.
    pub(crate) fn transition(
        &self,
        from: &[ServiceState],
        to: ServiceState,
    ) -> Result<ServiceState, ServiceState> {
        let mut observed = ServiceState::default();
        let moved = self.0.send_if_modified(|state| {
            observed = *state;
            if from.contains(state) {
                *state = to;
                true
            } else {
                false
            }
        });
        if moved {
            Ok(observed)
        } else {
            Err(observed)
        }
    }

    /// Wait until the state equals `target`.
    pub(crate) async fn wait_for(&self, target: ServiceState) {
        let mut rx = self.0.subscribe();
        // The sender is owned by `self`, so the channel cannot close here.
        let _ = rx.wait_for(|state| *state == target).await;
    }
}

impl Default for StateCell {
    fn default() -> Self {
        let (tx, _) = watch::channel(ServiceState::default());
        Self(tx)
    }
}
