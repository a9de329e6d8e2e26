// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced dispatcher wrapper for consistent observability

use tether_core::{Dispatch, DispatchError, Dispatched, Event};

/// Wrapper that adds tracing to any Dispatch
#[derive(Clone, Debug, Default)]
pub struct TracedDispatcher<D> {
    inner: D,
}

impl<D> TracedDispatcher<D> {
    pub fn new(inner: D) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Dispatch> Dispatch for TracedDispatcher<D> {
    fn dispatch(&self, event: Event) -> Result<Dispatched, DispatchError> {
        let span = tracing::info_span!("dispatch", event_type = %event.event_type);
        let _guard = span.enter();

        tracing::debug!(request = event.is_request(), "dispatching");

        let start = std::time::Instant::now();
        let result = self.inner.dispatch(event);
        let elapsed = start.elapsed();

        match &result {
            Ok(Dispatched::Event(_)) => tracing::debug!(
                elapsed_ms = elapsed.as_millis() as u64,
                "dispatched"
            ),
            Ok(Dispatched::Pending(_)) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                "dispatched, awaiting response"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "dispatch failed"
            ),
        }

        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
