// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Correlation engine
//!
//! Turns a resolve set, a reject set and an optional timeout into a single
//! [`EventFuture`]. Each non-empty set gets its own subscription; both are
//! released the moment the future settles or is canceled.

mod future;

pub use future::EventFuture;

use crate::config::ValidationMode;
use crate::descriptor::{resolve_types, EventDescriptor};
use crate::error::{ContractError, RejectError, TimeoutError};
use crate::event::EventType;
use crate::registry::Registry;
use crate::validate;
use std::time::Duration;
use tokio::runtime::Handle;

/// Declaration of a correlated wait
#[derive(Debug, Clone, Default)]
pub struct WaitSpec {
    pub(crate) resolve: Vec<EventType>,
    pub(crate) reject: Vec<EventType>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) timeout_message: Option<String>,
}

impl WaitSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events that resolve the wait
    pub fn resolve_on<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EventDescriptor>,
    {
        self.resolve.extend(resolve_types(descriptors));
        self
    }

    /// Events that reject the wait
    pub fn reject_on<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EventDescriptor>,
    {
        self.reject.extend(resolve_types(descriptors));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the message of the timeout error
    pub fn timeout_message(mut self, message: impl Into<String>) -> Self {
        self.timeout_message = Some(message.into());
        self
    }

    pub(crate) fn from_types(
        resolve: Vec<EventType>,
        reject: Vec<EventType>,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            resolve,
            reject,
            timeout,
            timeout_message: None,
        }
    }

    pub fn resolve_types(&self) -> &[EventType] {
        &self.resolve
    }

    pub fn reject_types(&self) -> &[EventType] {
        &self.reject
    }
}

/// Creates correlated waits against a registry
#[derive(Clone)]
pub struct Correlator {
    registry: Registry,
    validation: ValidationMode,
}

impl Correlator {
    pub fn new(registry: Registry) -> Self {
        let validation = registry.validation();
        Self {
            registry,
            validation,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Wait for any of `resolve` (success) or `reject` (failure).
    ///
    /// `timeout` of `None` waits indefinitely.
    pub fn wait<R, J>(
        &self,
        resolve: R,
        reject: J,
        timeout: Option<Duration>,
    ) -> Result<EventFuture, ContractError>
    where
        R: IntoIterator,
        R::Item: Into<EventDescriptor>,
        J: IntoIterator,
        J::Item: Into<EventDescriptor>,
    {
        let mut spec = WaitSpec::new().resolve_on(resolve).reject_on(reject);
        spec.timeout = timeout;
        self.wait_for(spec)
    }

    pub fn wait_for(&self, spec: WaitSpec) -> Result<EventFuture, ContractError> {
        self.check(&spec)?;
        Ok(self.start(spec))
    }

    /// Validate a spec without starting it
    pub(crate) fn check(&self, spec: &WaitSpec) -> Result<(), ContractError> {
        if self.validation.is_runtime() {
            validate::wait_sets(&spec.resolve, &spec.reject)?;
        }
        if spec.timeout.is_some() && Handle::try_current().is_err() {
            return Err(ContractError::TimerUnavailable);
        }
        Ok(())
    }

    /// Subscribe and arm the timer for an already-checked spec
    pub(crate) fn start(&self, spec: WaitSpec) -> EventFuture {
        let future = EventFuture::new();
        let mut subscriptions = Vec::with_capacity(2);
        let mut listeners = Vec::with_capacity(2);

        if !spec.resolve.is_empty() {
            let subscription = self.registry.subscribe_unchecked(spec.resolve);
            let settler = future.downgrade();
            listeners.push(subscription.add_listener(move |event| {
                tracing::trace!(event_type = %event.event_type, "wait resolved");
                settler.settle(Ok(event.clone()));
            }));
            subscriptions.push(subscription);
        }

        if !spec.reject.is_empty() {
            let subscription = self.registry.subscribe_unchecked(spec.reject);
            let settler = future.downgrade();
            listeners.push(subscription.add_listener(move |event| {
                tracing::trace!(event_type = %event.event_type, "wait rejected");
                settler.settle(Err(RejectError::new(event.clone()).into()));
            }));
            subscriptions.push(subscription);
        }

        let timer = match (spec.timeout, Handle::try_current()) {
            (Some(timeout), Ok(handle)) => {
                let settler = future.downgrade();
                let error = spec
                    .timeout_message
                    .map(TimeoutError::new)
                    .unwrap_or_default();
                let task = handle.spawn(async move {
                    tokio::time::sleep(timeout).await;
                    tracing::debug!(timeout_ms = timeout.as_millis() as u64, "wait timed out");
                    settler.settle(Err(error.into()));
                });
                Some(task.abort_handle())
            }
            (Some(_), Err(_)) => {
                tracing::warn!("no tokio runtime; wait armed without timeout");
                None
            }
            (None, _) => None,
        };

        future.install_teardown(Box::new(move || {
            for listener in listeners {
                listener.remove();
            }
            for subscription in subscriptions {
                subscription.unsubscribe();
            }
            if let Some(timer) = timer {
                timer.abort();
            }
        }));

        future
    }
}
