// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake dispatcher for testing
#![cfg_attr(coverage_nightly, coverage(off))]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tether_core::{Dispatch, DispatchError, Dispatched, Event, EventType, Registry};

/// Recorded dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchCall {
    pub event: Event,
}

impl DispatchCall {
    pub fn event_type(&self) -> &EventType {
        &self.event.event_type
    }
}

#[derive(Default)]
struct FakeState {
    calls: Vec<DispatchCall>,
    replies: HashMap<EventType, Vec<Event>>,
    failures: HashMap<EventType, String>,
    registry: Option<Registry>,
    outbox: Vec<Event>,
    immediate: bool,
}

/// Fake dispatcher for testing.
///
/// Records every dispatched event. Scripted replies are broadcast through
/// the connected registry, either on [`flush`](Self::flush) or, with
/// [`reply_immediately`](Self::reply_immediately), during the dispatch that
/// triggered them.
#[derive(Clone, Default)]
pub struct FakeDispatcher {
    inner: Arc<Mutex<FakeState>>,
}

impl FakeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that scripted replies are broadcast to
    pub fn connect(&self, registry: &Registry) {
        self.lock().registry = Some(registry.clone());
    }

    /// Reply with `reply` whenever an event of type `trigger` is dispatched
    pub fn on(&self, trigger: impl Into<EventType>, reply: Event) {
        self.lock()
            .replies
            .entry(trigger.into())
            .or_default()
            .push(reply);
    }

    /// Fail every dispatch of `trigger`
    pub fn fail(&self, trigger: impl Into<EventType>, message: impl Into<String>) {
        self.lock().failures.insert(trigger.into(), message.into());
    }

    pub fn reply_immediately(&self, immediate: bool) {
        self.lock().immediate = immediate;
    }

    /// Broadcast queued replies; returns how many were sent
    pub fn flush(&self) -> usize {
        let (registry, outbox) = {
            let mut state = self.lock();
            (state.registry.clone(), std::mem::take(&mut state.outbox))
        };
        let Some(registry) = registry else {
            return 0;
        };
        for reply in &outbox {
            registry.notify(reply);
        }
        outbox.len()
    }

    /// Get all recorded dispatches
    pub fn calls(&self) -> Vec<DispatchCall> {
        self.lock().calls.clone()
    }

    /// Types of all recorded dispatches, in order
    pub fn call_types(&self) -> Vec<EventType> {
        self.lock()
            .calls
            .iter()
            .map(|call| call.event.event_type.clone())
            .collect()
    }

    pub fn pending_replies(&self) -> usize {
        self.lock().outbox.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Dispatch for FakeDispatcher {
    fn dispatch(&self, event: Event) -> Result<Dispatched, DispatchError> {
        let immediate = {
            let mut state = self.lock();
            state.calls.push(DispatchCall {
                event: event.clone(),
            });
            if let Some(message) = state.failures.get(&event.event_type) {
                return Err(DispatchError::Failed(message.clone()));
            }
            let replies = state
                .replies
                .get(&event.event_type)
                .cloned()
                .unwrap_or_default();
            state.outbox.extend(replies);
            state.immediate
        };

        // Lock is released so replies may re-enter this dispatcher
        if immediate {
            self.flush();
        }
        Ok(Dispatched::Event(event))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
