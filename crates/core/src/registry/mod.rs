// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscription registry
//!
//! This module provides:
//! - `Registry` - index from event type to the listener groups interested in it
//! - `Subscription` - a set of event types plus its listener group
//! - `Listener` - handle for removing one callback from a subscription
//!
//! Notification is synchronous. Locks are never held while a callback runs,
//! so callbacks may subscribe, add or remove listeners, or notify again.

mod subscription;

pub use subscription::{Listener, Subscription};

use crate::config::{Config, ValidationMode};
use crate::descriptor::{resolve_types, EventDescriptor};
use crate::error::ContractError;
use crate::event::{Event, EventType};
use crate::validate;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Listener callback invoked with every matching event
pub(crate) type Callback = Arc<dyn Fn(&Event) + Send + Sync>;

/// Ordered callbacks belonging to one subscription
#[derive(Default)]
pub(crate) struct ListenerGroup {
    callbacks: Mutex<Vec<(u64, Callback)>>,
}

impl ListenerGroup {
    fn push(&self, id: u64, callback: Callback) {
        self.callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((id, callback));
    }

    /// Remove a callback; returns whether the group is now empty, or `None`
    /// if the callback was not present
    fn remove(&self, id: u64) -> Option<bool> {
        let mut callbacks = self.callbacks.lock().unwrap_or_else(|e| e.into_inner());
        let position = callbacks.iter().position(|(cid, _)| *cid == id)?;
        callbacks.remove(position);
        Some(callbacks.is_empty())
    }

    fn snapshot(&self) -> Vec<Callback> {
        self.callbacks
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .map(|(_, callback)| Arc::clone(callback))
            .collect()
    }

    fn len(&self) -> usize {
        self.callbacks.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

type Index = HashMap<EventType, Vec<Arc<ListenerGroup>>>;

struct RegistryInner {
    index: Mutex<Index>,
    validation: ValidationMode,
    next_listener: AtomicU64,
}

/// Routes events to the listener groups subscribed to their type
#[derive(Clone)]
pub struct Registry {
    inner: Arc<RegistryInner>,
}

impl Registry {
    pub fn new(config: &Config) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                index: Mutex::new(HashMap::new()),
                validation: config.acquire(),
                next_listener: AtomicU64::new(1),
            }),
        }
    }

    pub fn validation(&self) -> ValidationMode {
        self.inner.validation
    }

    /// Create an inert subscription to the given event types.
    ///
    /// The subscription is added to the index when its first listener is
    /// attached.
    pub fn subscribe<I>(&self, descriptors: I) -> Result<Subscription, ContractError>
    where
        I: IntoIterator,
        I::Item: Into<EventDescriptor>,
    {
        self.subscribe_types(resolve_types(descriptors))
    }

    /// Same as [`subscribe`](Self::subscribe) with already-resolved types
    pub fn subscribe_types(&self, event_types: Vec<EventType>) -> Result<Subscription, ContractError> {
        if self.inner.validation.is_runtime() {
            validate::non_empty(&event_types, "subscription")?;
            validate::unique(&event_types, "subscription")?;
        }
        Ok(self.subscribe_unchecked(event_types))
    }

    pub(crate) fn subscribe_unchecked(&self, event_types: Vec<EventType>) -> Subscription {
        Subscription::new(self.clone(), event_types)
    }

    /// Invoke every listener registered for the event's type, in
    /// registration order.
    ///
    /// Both the group list and each group's callbacks are copied before the
    /// first callback runs: listeners removed during this call still see the
    /// event, listeners added during this call do not.
    pub fn notify(&self, event: &Event) {
        let groups = {
            let index = self.inner.index.lock().unwrap_or_else(|e| e.into_inner());
            match index.get(&event.event_type) {
                Some(groups) => groups.clone(),
                None => return,
            }
        };
        let callbacks: Vec<Callback> = groups.iter().flat_map(|group| group.snapshot()).collect();

        tracing::trace!(
            event_type = %event.event_type,
            groups = groups.len(),
            listeners = callbacks.len(),
            "notify"
        );

        for callback in callbacks {
            callback(event);
        }
    }

    /// Number of event types with at least one listener group
    pub fn len(&self) -> usize {
        self.inner
            .index
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, event_type: &EventType) -> bool {
        self.inner
            .index
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(event_type)
    }

    /// Number of listener groups registered for an event type
    pub fn group_count(&self, event_type: &EventType) -> usize {
        self.inner
            .index
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .get(event_type)
            .map_or(0, Vec::len)
    }

    /// Event types currently present in the index, sorted
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self
            .inner
            .index
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .keys()
            .cloned()
            .collect();
        types.sort();
        types
    }

    fn next_listener_id(&self) -> u64 {
        self.inner.next_listener.fetch_add(1, Ordering::Relaxed)
    }

    /// Push a group onto the entry of every event type
    fn attach(&self, event_types: &[EventType], group: &Arc<ListenerGroup>) {
        let mut index = self.inner.index.lock().unwrap_or_else(|e| e.into_inner());
        for event_type in event_types {
            index
                .entry(event_type.clone())
                .or_default()
                .push(Arc::clone(group));
        }
    }

    /// Remove a group from every entry, dropping entries left empty
    fn detach(&self, event_types: &[EventType], group: &Arc<ListenerGroup>) {
        let mut index = self.inner.index.lock().unwrap_or_else(|e| e.into_inner());
        for event_type in event_types {
            let Some(groups) = index.get_mut(event_type) else {
                continue;
            };
            if let Some(position) = groups.iter().position(|g| Arc::ptr_eq(g, group)) {
                groups.remove(position);
            }
            if groups.is_empty() {
                index.remove(event_type);
            }
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
