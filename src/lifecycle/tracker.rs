//! Background task tracking.
//!
//! # Responsibilities
//! - Count background starts still running
//! - Let shutdown wait until every one of them has returned
//!
//! # Design Decisions
//! - RAII guard decrements on drop, including while unwinding from a panic
//! - Count lives in a watch channel so waiters wake on change instead of polling

use std::sync::Arc;
use tokio::sync::watch;

/// Tracks live background service tasks.
#[derive(Debug, Clone)]
pub(crate) struct BackgroundTracker {
    active: Arc<watch::Sender<usize>>,
}

impl BackgroundTracker {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(0);
        Self {
            active: Arc::new(tx),
        }
    }

    /// Record a background task. The returned guard decrements on drop.
    pub(crate) fn track(&self, service: impl Into<String>) -> BackgroundGuard {
        self.active.send_modify(|count| *count += 1);
        BackgroundGuard {
            active: Arc::clone(&self.active),
            service: service.into(),
        }
    }

    /// Current count of live background tasks.
    pub(crate) fn active_count(&self) -> usize {
        *self.active.borrow()
    }

    /// Wait until no background task is live.
    pub(crate) async fn wait_idle(&self) {
        let mut rx = self.active.subscribe();
        // The sender is owned by `self`, so the channel cannot close here.
        let _ = rx.wait_for(|count| *count == 0).await;
    }
}

impl Default for BackgroundTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard held by a background task for as long as its `start` runs.
#[derive(Debug)]
pub(crate) struct BackgroundGuard {
    active: Arc<watch::Sender<usize>>,
    service: String,
}

impl Drop for BackgroundGuard {
    fn drop(&mut self) {
        self.active.send_modify(|count| *count -= 1);
        tracing::trace!(service = %self.service, "Background task released");
    }
}
