// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queue items and insertion ordering

use crate::correlate::WaitSpec;
use crate::descriptor::{resolve_types, EventDescriptor};
use crate::event::{Event, EventType};
use std::time::Duration;

/// One "dispatch, then wait for completion" step.
///
/// An item with no completion or failure types completes as soon as its
/// start event has been dispatched.
#[derive(Debug, Clone)]
pub struct QueueItem {
    pub(crate) start: Event,
    pub(crate) complete: Vec<EventType>,
    pub(crate) fail: Vec<EventType>,
    pub(crate) priority: Option<i64>,
    pub(crate) timeout: Option<Duration>,
}

impl QueueItem {
    /// Item whose start event is resolved from `start` (factories are
    /// invoked once, here)
    pub fn new(start: impl Into<EventDescriptor>) -> Self {
        Self {
            start: start.into().to_event(),
            complete: Vec::new(),
            fail: Vec::new(),
            priority: None,
            timeout: None,
        }
    }

    pub fn complete_on<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EventDescriptor>,
    {
        self.complete.extend(resolve_types(descriptors));
        self
    }

    pub fn fail_on<I>(mut self, descriptors: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<EventDescriptor>,
    {
        self.fail.extend(resolve_types(descriptors));
        self
    }

    /// Higher runs earlier; items without a priority keep enqueue order
    pub fn priority(mut self, priority: i64) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn start(&self) -> &Event {
        &self.start
    }

    pub fn priority_value(&self) -> Option<i64> {
        self.priority
    }

    /// Whether the item waits for an event after dispatch
    pub fn awaits_completion(&self) -> bool {
        !self.complete.is_empty() || !self.fail.is_empty()
    }

    pub(crate) fn wait_spec(&self) -> WaitSpec {
        WaitSpec::from_types(self.complete.clone(), self.fail.clone(), self.timeout)
    }
}

/// A request event becomes an item completing on its resolve types and
/// failing on its reject types.
impl From<Event> for QueueItem {
    fn from(event: Event) -> Self {
        let (complete, fail, timeout) = match &event.request {
            Some(request) => (
                request.resolve.clone(),
                request.reject.clone(),
                request.timeout(),
            ),
            None => (Vec::new(), Vec::new(), None),
        };
        Self {
            start: event,
            complete,
            fail,
            priority: None,
            timeout,
        }
    }
}

/// Position for a new item given the priorities already queued.
///
/// Scans from the tail and stops after the first item that has no priority
/// or a priority at least as high as the new one. A new item without a
/// priority always goes to the tail.
pub(crate) fn insertion_index<I>(priorities: I, priority: Option<i64>) -> usize
where
    I: DoubleEndedIterator<Item = Option<i64>> + ExactSizeIterator,
{
    let len = priorities.len();
    for (offset, existing) in priorities.rev().enumerate() {
        match (existing, priority) {
            (Some(existing), Some(new)) if existing < new => continue,
            _ => return len - offset,
        }
    }
    0
}

#[cfg(test)]
#[path = "item_tests.rs"]
mod tests;
