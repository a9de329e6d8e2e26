// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! No-op dispatcher for hubs without a host.

use tether_core::{Dispatch, DispatchError, Dispatched, Event};

/// Dispatcher that hands every event straight back.
///
/// Used when the hub itself is the only consumer of its events.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOpDispatcher;

impl NoOpDispatcher {
    pub fn new() -> Self {
        Self
    }
}

impl Dispatch for NoOpDispatcher {
    fn dispatch(&self, event: Event) -> Result<Dispatched, DispatchError> {
        Ok(Dispatched::Event(event))
    }
}
