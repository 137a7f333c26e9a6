//! Shared services and helpers for lifecycle integration tests.

#![allow(dead_code)]

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use service_start::{BoxError, Context, Logger, Service};
use tokio_util::sync::CancellationToken;

/// Ordered record of what the services under test did.
#[derive(Debug, Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn record(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn contains(&self, entry: &str) -> bool {
        self.0.lock().unwrap().iter().any(|e| e == entry)
    }

    /// Entries ending with `suffix`, in order, with the suffix stripped.
    pub fn with_suffix(&self, suffix: &str) -> Vec<String> {
        self.entries()
            .iter()
            .filter_map(|e| e.strip_suffix(suffix).map(str::to_string))
            .collect()
    }

    /// A logger that records every lifecycle line here.
    pub fn logger(&self) -> impl Logger + 'static {
        let journal = self.clone();
        move |args: fmt::Arguments<'_>| journal.record(args.to_string())
    }
}

/// Foreground service that records its calls and can be told to fail.
pub struct Recorder {
    name: String,
    journal: Journal,
    start_error: Option<&'static str>,
    shutdown_error: Option<&'static str>,
    start_delay: Duration,
    shutdown_delay: Duration,
}

impl Recorder {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            start_error: None,
            shutdown_error: None,
            start_delay: Duration::ZERO,
            shutdown_delay: Duration::ZERO,
        }
    }

    pub fn fail_start(mut self, message: &'static str) -> Self {
        self.start_error = Some(message);
        self
    }

    pub fn fail_shutdown(mut self, message: &'static str) -> Self {
        self.shutdown_error = Some(message);
        self
    }

    pub fn start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    /// Take this long to stop; `<name>:stopped` is recorded afterwards.
    pub fn shutdown_delay(mut self, delay: Duration) -> Self {
        self.shutdown_delay = delay;
        self
    }
}

#[async_trait]
impl Service for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, _ctx: &Context) -> Result<(), BoxError> {
        if !self.start_delay.is_zero() {
            tokio::time::sleep(self.start_delay).await;
        }
        self.journal.record(format!("{}:start", self.name));
        match self.start_error {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }

    async fn shutdown(&self, _ctx: &Context) -> Result<(), BoxError> {
        self.journal.record(format!("{}:shutdown", self.name));
        if !self.shutdown_delay.is_zero() {
            tokio::time::sleep(self.shutdown_delay).await;
            self.journal.record(format!("{}:stopped", self.name));
        }
        match self.shutdown_error {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }
}

/// Background service whose start blocks until shutdown releases it.
pub struct Daemon {
    name: String,
    journal: Journal,
    stop: CancellationToken,
    linger: Duration,
    exit_error: Option<&'static str>,
}

impl Daemon {
    pub fn new(name: &str, journal: &Journal) -> Self {
        Self {
            name: name.to_string(),
            journal: journal.clone(),
            stop: CancellationToken::new(),
            linger: Duration::ZERO,
            exit_error: None,
        }
    }

    /// Keep running this long after being released.
    pub fn linger(mut self, linger: Duration) -> Self {
        self.linger = linger;
        self
    }

    /// Return this error from start once released.
    pub fn exit_error(mut self, message: &'static str) -> Self {
        self.exit_error = Some(message);
        self
    }
}

#[async_trait]
impl Service for Daemon {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, _ctx: &Context) -> Result<(), BoxError> {
        self.journal.record(format!("{}:start", self.name));
        self.stop.cancelled().await;
        if !self.linger.is_zero() {
            tokio::time::sleep(self.linger).await;
        }
        self.journal.record(format!("{}:returned", self.name));
        match self.exit_error {
            Some(message) => Err(message.into()),
            None => Ok(()),
        }
    }

    async fn shutdown(&self, _ctx: &Context) -> Result<(), BoxError> {
        self.journal.record(format!("{}:shutdown", self.name));
        self.stop.cancel();
        Ok(())
    }
}

/// Background service whose start fails, optionally after a delay.
pub struct Crasher {
    name: String,
    delay: Duration,
    panics: bool,
}

impl Crasher {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            delay: Duration::ZERO,
            panics: false,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn panicking(mut self) -> Self {
        self.panics = true;
        self
    }
}

#[async_trait]
impl Service for Crasher {
    fn name(&self) -> &str {
        &self.name
    }

    async fn start(&self, _ctx: &Context) -> Result<(), BoxError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.panics {
            panic!("{} exploded", self.name);
        }
        Err(format!("{} crashed on boot", self.name).into())
    }

    async fn shutdown(&self, _ctx: &Context) -> Result<(), BoxError> {
        Ok(())
    }
}

/// Guard against a hung lifecycle call failing the suite by timeout only.
pub async fn within<F: std::future::Future>(limit: Duration, fut: F) -> F::Output {
    tokio::time::timeout(limit, fut)
        .await
        .expect("lifecycle call did not finish in time")
}
