//! Lifecycle errors and the failure accumulator.

use std::fmt;
use std::sync::{Mutex, PoisonError};

use thiserror::Error;

use crate::service::BoxError;

/// Errors returned by [`Manager`](crate::Manager) operations.
#[derive(Debug, Error)]
pub enum Error {
    /// One or more services failed to start.
    #[error("service_start: startup error: {0}")]
    Startup(JoinedError),

    /// One or more services failed to shut down, or a background service
    /// reported a start failure after startup completed.
    #[error("service_start: shutdown error: {0}")]
    Shutdown(JoinedError),
}

impl Error {
    /// The individual service failures behind this error.
    pub fn failures(&self) -> &JoinedError {
        match self {
            Error::Startup(joined) | Error::Shutdown(joined) => joined,
        }
    }
}

/// Result type for lifecycle operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Sentinel a service can return or match on while the process tears down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("service_start: shutting down")]
pub struct ShuttingDown;

/// Whether `err` is the [`ShuttingDown`] sentinel.
pub fn is_shutting_down(err: &BoxError) -> bool {
    err.downcast_ref::<ShuttingDown>().is_some()
}

/// A single failed service call.
#[derive(Debug, Error)]
#[error("'{service}': {source}")]
pub struct ServiceFailure {
    service: String,
    source: BoxError,
}

impl ServiceFailure {
    pub fn new(service: impl Into<String>, source: BoxError) -> Self {
        Self {
            service: service.into(),
            source,
        }
    }

    /// Name of the service that failed.
    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn cause(&self) -> &BoxError {
        &self.source
    }
}

/// Ordered combination of service failures.
///
/// Failures keep the order in which they were joined; none are dropped.
#[derive(Debug, Default)]
pub struct JoinedError {
    failures: Vec<ServiceFailure>,
}

impl JoinedError {
    pub fn push(&mut self, failure: ServiceFailure) {
        self.failures.push(failure);
    }

    /// Append every failure of `other` after the ones already held.
    pub fn join(&mut self, other: JoinedError) {
        self.failures.extend(other.failures);
    }

    pub fn len(&self) -> usize {
        self.failures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ServiceFailure> {
        self.failures.iter()
    }

    /// Whether any failure was reported by the service called `name`.
    pub fn contains_service(&self, name: &str) -> bool {
        self.failures.iter().any(|f| f.service == name)
    }

    pub fn into_failures(self) -> Vec<ServiceFailure> {
        self.failures
    }
}

impl fmt::Display for JoinedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

impl std::error::Error for JoinedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.failures
            .first()
            .map(|f| f as &(dyn std::error::Error + 'static))
    }
}

impl From<ServiceFailure> for JoinedError {
    fn from(failure: ServiceFailure) -> Self {
        Self {
            failures: vec![failure],
        }
    }
}

/// Mutex-guarded accumulator shared by the driving task and background tasks.
#[derive(Debug, Default)]
pub(crate) struct FailureSink {
    joined: Mutex<JoinedError>,
}

impl FailureSink {
    pub(crate) fn push(&self, failure: ServiceFailure) {
        self.joined
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(failure);
    }

    /// Take everything joined so far, leaving the sink empty.
    pub(crate) fn take(&self) -> JoinedError {
        std::mem::take(&mut *self.joined.lock().unwrap_or_else(PoisonError::into_inner))
    }
}
