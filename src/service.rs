//! The service capability and a closure-based adapter.

use std::fmt;
use std::future::Future;

use async_trait::async_trait;
use futures_util::future::{BoxFuture, FutureExt};

use crate::context::Context;

/// Error type returned by service operations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A named unit of work the [`Manager`](crate::Manager) starts and stops.
///
/// A background service's `start` is expected to run until its `shutdown`
/// makes it return.
#[async_trait]
pub trait Service: Send + Sync + 'static {
    fn name(&self) -> &str;

    async fn start(&self, ctx: &Context) -> Result<(), BoxError>;

    async fn shutdown(&self, ctx: &Context) -> Result<(), BoxError>;
}

type Hook = Box<dyn Fn(Context) -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// A [`Service`] built from a name and two optional closures.
///
/// A missing closure succeeds without doing anything.
pub struct FnService {
    name: String,
    start: Option<Hook>,
    shutdown: Option<Hook>,
}

impl FnService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: None,
            shutdown: None,
        }
    }

    pub fn on_start<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.start = Some(Box::new(move |ctx| f(ctx).boxed()));
        self
    }

    pub fn on_shutdown<F, Fut>(mut self, f: F) -> Self
    where
        F: Fn(Context) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.shutdown = Some(Box::new(move |ctx| f(ctx).boxed()));
        self
    }
}

impl fmt::Debug for FnService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnService")
            .field("name", &self.name)
            .field("start", &self.start.is_some())
            .field("shutdown", &self.shutdown.is_some())
            .finish()
    }
}

#[async_trait]
impl Service for FnService {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, ctx: &Context) -> Result<(), BoxError> {
        match &self.start {
            Some(hook) => hook(ctx.clone()).await,
            None => Ok(()),
        }
    }

    async fn shutdown(&self, ctx: &Context) -> Result<(), BoxError> {
        match &self.shutdown {
            Some(hook) => hook(ctx.clone()).await,
            None => Ok(()),
        }
    }
}

/// Build a service from a start and a shutdown closure.
pub fn new_service<S, SFut, D, DFut>(name: impl Into<String>, start: S, shutdown: D) -> FnService
where
    S: Fn(Context) -> SFut + Send + Sync + 'static,
    SFut: Future<Output = Result<(), BoxError>> + Send + 'static,
    D: Fn(Context) -> DFut + Send + Sync + 'static,
    DFut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    FnService::new(name).on_start(start).on_shutdown(shutdown)
}
