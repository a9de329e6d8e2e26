// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Hub: registry, correlator and host dispatcher wired together
//!
//! Every event dispatched through the hub is delivered to the host and then
//! broadcast to the registry. A request event (one carrying
//! [`Correlation`](crate::Correlation) metadata) additionally yields a
//! pending [`EventFuture`] that settles on its correlated response.

use crate::config::Config;
use crate::correlate::{Correlator, EventFuture, WaitSpec};
use crate::descriptor::EventDescriptor;
use crate::dispatch::{Dispatch, Dispatched};
use crate::error::{ContractError, DispatchError};
use crate::event::Event;
use crate::queue::Queue;
use crate::registry::{Registry, Subscription};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct Hub {
    correlator: Correlator,
    host: Arc<dyn Dispatch>,
}

impl Hub {
    pub fn new(config: &Config, host: impl Dispatch + 'static) -> Self {
        Self {
            correlator: Correlator::new(Registry::new(config)),
            host: Arc::new(host),
        }
    }

    pub fn registry(&self) -> &Registry {
        self.correlator.registry()
    }

    pub fn correlator(&self) -> &Correlator {
        &self.correlator
    }

    /// Deliver an event to the host, then to the registry.
    ///
    /// Returns the host's result, or `Dispatched::Pending` when the event is
    /// a request. Request metadata is checked before the host sees the
    /// event.
    pub fn dispatch(&self, descriptor: impl Into<EventDescriptor>) -> Result<Dispatched, DispatchError> {
        let event = descriptor.into().to_event();

        let spec = event.request.as_ref().map(|request| {
            WaitSpec::from_types(
                request.resolve.clone(),
                request.reject.clone(),
                request.timeout(),
            )
        });
        if let Some(spec) = &spec {
            self.correlator.check(spec)?;
        }

        let span = tracing::debug_span!("hub.dispatch", event_type = %event.event_type);
        let _guard = span.enter();

        let dispatched = self.host.dispatch(event.clone())?;
        let result = match spec {
            Some(spec) => {
                tracing::debug!("request event; awaiting correlated response");
                Dispatched::Pending(self.correlator.start(spec))
            }
            None => dispatched,
        };

        // Waits created above see this event too
        self.registry().notify(&event);
        Ok(result)
    }

    /// Broadcast an event that entered from outside the hub
    pub fn notify(&self, event: &Event) {
        self.registry().notify(event);
    }

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
        self.correlator.wait(resolve, reject, timeout)
    }

    pub fn wait_for(&self, spec: WaitSpec) -> Result<EventFuture, ContractError> {
        self.correlator.wait_for(spec)
    }

    pub fn subscribe<I>(&self, descriptors: I) -> Result<Subscription, ContractError>
    where
        I: IntoIterator,
        I::Item: Into<EventDescriptor>,
    {
        self.registry().subscribe(descriptors)
    }

    /// A new queue whose start events go through this hub
    pub fn queue(&self) -> Queue {
        Queue::new(self.correlator.clone(), self.clone())
    }
}

impl Dispatch for Hub {
    fn dispatch(&self, event: Event) -> Result<Dispatched, DispatchError> {
        Hub::dispatch(self, event)
    }
}

#[cfg(test)]
#[path = "hub_tests.rs"]
mod tests;
