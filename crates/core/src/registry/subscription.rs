// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Subscriptions and listener handles

use super::{Callback, ListenerGroup, Registry};
use crate::event::{Event, EventType};
use std::sync::{Arc, Mutex, MutexGuard};

struct SubscriptionInner {
    registry: Registry,
    event_types: Vec<EventType>,
    group: Arc<ListenerGroup>,
    active: Mutex<bool>,
}

/// Interest in a set of event types.
///
/// Inert until the first listener is attached. Becomes inactive again when
/// its last listener is removed or when [`unsubscribe`](Self::unsubscribe)
/// is called; attaching another listener re-activates it.
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    pub(super) fn new(registry: Registry, event_types: Vec<EventType>) -> Self {
        Self {
            inner: Arc::new(SubscriptionInner {
                registry,
                event_types,
                group: Arc::new(ListenerGroup::default()),
                active: Mutex::new(false),
            }),
        }
    }

    /// Attach a callback, activating the subscription if needed
    pub fn add_listener(&self, callback: impl Fn(&Event) + Send + Sync + 'static) -> Listener {
        let id = self.inner.registry.next_listener_id();
        let callback: Callback = Arc::new(callback);

        let mut active = self.lock_active();
        self.inner.group.push(id, callback);
        if !*active {
            self.inner
                .registry
                .attach(&self.inner.event_types, &self.inner.group);
            *active = true;
            tracing::trace!(event_types = ?self.inner.event_types, "subscription activated");
        }
        drop(active);

        Listener {
            subscription: self.clone(),
            id,
        }
    }

    /// Remove this subscription from the index regardless of its listeners
    pub fn unsubscribe(&self) {
        let mut active = self.lock_active();
        self.deactivate(&mut active);
    }

    pub fn is_active(&self) -> bool {
        *self.lock_active()
    }

    pub fn event_types(&self) -> &[EventType] {
        &self.inner.event_types
    }

    pub fn listener_count(&self) -> usize {
        self.inner.group.len()
    }

    fn lock_active(&self) -> MutexGuard<'_, bool> {
        self.inner.active.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Detach from the index; the caller holds the activity lock
    fn deactivate(&self, active: &mut bool) {
        if *active {
            self.inner
                .registry
                .detach(&self.inner.event_types, &self.inner.group);
            tracing::trace!(event_types = ?self.inner.event_types, "subscription deactivated");
        }
        *active = false;
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("event_types", &self.inner.event_types)
            .field("active", &self.is_active())
            .field("listeners", &self.listener_count())
            .finish()
    }
}

/// Handle to one callback attached to a subscription
#[derive(Clone)]
pub struct Listener {
    subscription: Subscription,
    id: u64,
}

impl Listener {
    /// Detach the callback. Removing the last callback deactivates the
    /// subscription. Calling this more than once is a no-op.
    pub fn remove(&self) {
        // Removal and detach happen under one activity lock
        let mut active = self.subscription.lock_active();
        let Some(now_empty) = self.subscription.inner.group.remove(self.id) else {
            return;
        };
        if now_empty {
            self.subscription.deactivate(&mut active);
        }
    }

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }
}

#[cfg(test)]
#[path = "subscription_tests.rs"]
mod tests;
