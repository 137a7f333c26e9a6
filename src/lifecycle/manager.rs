//! Service orchestration.
//!
//! # Responsibilities
//! - Keep registrations ordered by priority
//! - Start services in priority order, spawning background ones
//! - Stop services in reverse order and drain background tasks
//! - Join every failure into one error per phase
//!
//! # Design Decisions
//! - Foreground starts and all shutdowns run one at a time on the caller's task
//! - Failures from all tasks go through one mutex-guarded sink
//! - Background start failures that arrive late are reported by `shutdown`
//! - Shutdown only tears down once; a concurrent call waits for it to finish

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;

use crate::config::{LoggerKind, ManagerConfig};
use crate::context::Context;
use crate::error::{Error, FailureSink, Result, ServiceFailure};
use crate::lifecycle::registration::{sort_by_priority, Registration, ServiceOption};
use crate::lifecycle::signals::{Signal, SignalListener};
use crate::lifecycle::state::{ServiceState, StateCell};
use crate::lifecycle::tracker::BackgroundTracker;
use crate::observability::{Logger, NopLogger, StandardLogger};
use crate::service::Service;

/// Construction options for a [`Manager`].
#[derive(Clone, Default)]
pub struct ManagerOptions {
    /// Lifecycle logger; `StandardLogger` when unset.
    pub logger: Option<Arc<dyn Logger>>,
}

impl ManagerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_logger(mut self, logger: impl Logger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }
}

/// Starts registered services in priority order and stops them in reverse.
pub struct Manager {
    state: StateCell,
    services: Vec<Registration>,
    tracker: BackgroundTracker,
    failures: Arc<FailureSink>,
    logger: Arc<dyn Logger>,
}

impl Manager {
    pub fn new(options: ManagerOptions) -> Self {
        Self {
            state: StateCell::default(),
            services: Vec::new(),
            tracker: BackgroundTracker::new(),
            failures: Arc::new(FailureSink::default()),
            logger: options.logger.unwrap_or_else(|| Arc::new(StandardLogger)),
        }
    }

    pub fn from_config(config: &ManagerConfig) -> Self {
        let logger: Arc<dyn Logger> = match config.logging.lifecycle_logger {
            LoggerKind::Standard => Arc::new(StandardLogger),
            LoggerKind::Nop => Arc::new(NopLogger),
        };
        Self::new(ManagerOptions {
            logger: Some(logger),
        })
    }

    pub fn state(&self) -> ServiceState {
        self.state.get()
    }

    /// Registrations in start order.
    pub fn registrations(&self) -> &[Registration] {
        &self.services
    }

    /// Number of background starts that have not returned yet.
    pub fn background_count(&self) -> usize {
        self.tracker.active_count()
    }

    /// Register a service. Must be called before [`Manager::start`].
    pub fn add_service<S: Service>(&mut self, service: S, options: &[ServiceOption]) {
        self.add_shared(Arc::new(service), options);
    }

    /// Register a service the caller keeps a handle to.
    pub fn add_shared(&mut self, service: Arc<dyn Service>, options: &[ServiceOption]) {
        self.services.push(Registration::new(service, options));
        sort_by_priority(&mut self.services);
    }

    /// Start every service in priority order.
    ///
    /// Foreground starts run inline, one after another. Background starts are
    /// spawned and not awaited. On failure the manager stays `Starting` and
    /// the error lists every service that failed so far.
    pub async fn start(&self, ctx: &Context) -> Result<()> {
        self.state.set(ServiceState::Starting);

        for registration in &self.services {
            self.logger
                .info(format_args!("service_start: start '{}'", registration.name()));

            if registration.is_background() {
                self.spawn_background(registration, ctx);
            } else if let Err(source) = registration.service().start(ctx).await {
                self.failures
                    .push(ServiceFailure::new(registration.name(), source));
            }
        }

        let failures = self.failures.take();
        if !failures.is_empty() {
            return Err(Error::Startup(failures));
        }

        self.state.set(ServiceState::Running);
        Ok(())
    }

    fn spawn_background(&self, registration: &Registration, ctx: &Context) {
        let guard = self.tracker.track(registration.name());
        let service = Arc::clone(registration.service());
        let failures = Arc::clone(&self.failures);
        let logger = Arc::clone(&self.logger);
        let ctx = ctx.clone();

        tokio::spawn(async move {
            let result = AssertUnwindSafe(service.start(&ctx)).catch_unwind().await;
            match result {
                Ok(Ok(())) => {}
                Ok(Err(source)) => failures.push(ServiceFailure::new(service.name(), source)),
                Err(_) => {
                    tracing::error!(service = %service.name(), "Background service panicked");
                    failures.push(ServiceFailure::new(
                        service.name(),
                        "background start panicked".into(),
                    ));
                }
            }
            logger.info(format_args!("service_start: '{}' stopped", service.name()));
            drop(guard);
        });
    }

    /// Block until SIGINT, SIGTERM or `ctx` is done, then shut down.
    ///
    /// Returns the signal that triggered shutdown (`None` when the context
    /// did) together with the shutdown result.
    pub async fn wait(&self, ctx: &Context) -> (Option<Signal>, Result<()>) {
        let signal = {
            let mut listener = SignalListener::subscribe();
            tokio::select! {
                signal = listener.recv() => Some(signal),
                _ = ctx.done() => None,
            }
        };

        match signal {
            Some(signal) => tracing::info!(%signal, "Shutdown signal received"),
            None => tracing::info!("Context done, shutting down"),
        }

        (signal, self.shutdown(ctx).await)
    }

    /// Stop every service in reverse start order, then wait for all
    /// background starts to return.
    ///
    /// Every service is asked to stop even if an earlier one failed. There is
    /// no timeout on the background drain: a background start that never
    /// returns blocks this call.
    ///
    /// A call made while another shutdown is in progress waits until that one
    /// reaches `Exited` and returns `Ok(())`; the failures are reported to the
    /// call that did the teardown.
    pub async fn shutdown(&self, ctx: &Context) -> Result<()> {
        let from = [
            ServiceState::Starting,
            ServiceState::Running,
            ServiceState::Error,
        ];
        match self.state.transition(&from, ServiceState::InShutdown) {
            Ok(_) => {}
            Err(ServiceState::InShutdown) => {
                tracing::debug!("Shutdown already in progress, waiting for it");
                self.state.wait_for(ServiceState::Exited).await;
                return Ok(());
            }
            Err(current) => {
                tracing::debug!(state = %current, "Shutdown skipped, services not running");
                self.tracker.wait_idle().await;
                return Ok(());
            }
        }

        for registration in self.services.iter().rev() {
            self.logger
                .info(format_args!("service_start: shutdown '{}'", registration.name()));

            if let Err(source) = registration.service().shutdown(ctx).await {
                self.failures
                    .push(ServiceFailure::new(registration.name(), source));
            }
        }

        self.tracker.wait_idle().await;
        self.state.set(ServiceState::Exited);

        let failures = self.failures.take();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::Shutdown(failures))
        }
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new(ManagerOptions::default())
    }
}

impl std::fmt::Debug for Manager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Manager")
            .field("state", &self.state.get())
            .field("services", &self.services)
            .field("background", &self.tracker.active_count())
            .finish()
    }
}
