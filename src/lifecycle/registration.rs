//! Service registration and start ordering.

use std::sync::Arc;

use crate::service::Service;

/// A service plus the metadata the manager schedules it by.
#[derive(Clone)]
pub struct Registration {
    service: Arc<dyn Service>,
    priority: i32,
    background: bool,
}

impl Registration {
    pub(crate) fn new(service: Arc<dyn Service>, options: &[ServiceOption]) -> Self {
        let mut registration = Self {
            service,
            priority: 0,
            background: false,
        };
        for option in options {
            option.apply(&mut registration);
        }
        registration
    }

    pub fn name(&self) -> &str {
        self.service.name()
    }

    /// Higher values start earlier and stop later.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// Whether `start` runs on its own task instead of inline.
    pub fn is_background(&self) -> bool {
        self.background
    }

    pub fn service(&self) -> &Arc<dyn Service> {
        &self.service
    }
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name())
            .field("priority", &self.priority)
            .field("background", &self.background)
            .finish()
    }
}

/// Mutation applied to a [`Registration`] when it is added.
///
/// Options writing the same field are applied in order; the last one wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceOption {
    Priority(i32),
    Background,
}

impl ServiceOption {
    fn apply(self, registration: &mut Registration) {
        match self {
            ServiceOption::Priority(priority) => registration.priority = priority,
            ServiceOption::Background => registration.background = true,
        }
    }
}

/// Start earlier than services with a lower priority.
pub fn with_priority(priority: i32) -> ServiceOption {
    ServiceOption::Priority(priority)
}

/// Run `start` in the background; the manager does not wait for it to return.
pub fn with_background() -> ServiceOption {
    ServiceOption::Background
}

/// Keep `registrations` ordered by priority, highest first.
///
/// The sort is stable so equal priorities keep insertion order.
pub(crate) fn sort_by_priority(registrations: &mut [Registration]) {
    registrations.sort_by_key(|r| std::cmp::Reverse(r.priority));
}
