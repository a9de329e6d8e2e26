// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sequential priority queue
//!
//! Runs one item at a time: dispatch its start event, wait for one of its
//! completion or failure events, settle its ticket, move on. Items are kept
//! in descending priority order; equal priorities keep enqueue order.
//!
//! State transitions:
//! - `Waiting` -> `Active` when the processor starts the head item
//! - `Active` -> `Waiting` when that item settles or is canceled
//! - any -> `Paused` on [`Queue::pause`]; `Paused` -> `Waiting` on
//!   [`Queue::resume`]. Pausing never interrupts the item in flight.

mod item;
mod ticket;

pub use item::QueueItem;
pub use ticket::QueueTicket;

use crate::correlate::{Correlator, EventFuture};
use crate::dispatch::{Dispatch, Dispatched};
use crate::error::{ContractError, WaitError};
use crate::event::Event;
use item::insertion_index;
use std::fmt;
use std::sync::{Arc, Mutex};

/// Item ids restart at 1 after this value
const MAX_ITEM_ID: u64 = u64::MAX;

/// Whether the processor may start the next item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Waiting,
    Active,
    Paused,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunState::Waiting => write!(f, "waiting"),
            RunState::Active => write!(f, "active"),
            RunState::Paused => write!(f, "paused"),
        }
    }
}

struct Entry {
    id: u64,
    item: QueueItem,
    ticket: EventFuture,
    /// Waits racing for this item's completion; `Some` while in flight
    in_flight: Option<Vec<EventFuture>>,
}

#[derive(Default)]
struct QueueState {
    items: Vec<Entry>,
    run: RunState,
    last_id: u64,
    /// Set while a `process` call owns the start loop
    draining: bool,
}

impl QueueState {
    fn next_id(&mut self) -> u64 {
        self.last_id = if self.last_id >= MAX_ITEM_ID {
            1
        } else {
            self.last_id + 1
        };
        self.last_id
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.items.iter().position(|entry| entry.id == id)
    }
}

struct QueueInner {
    state: Mutex<QueueState>,
    correlator: Correlator,
    dispatcher: Arc<dyn Dispatch>,
}

/// Priority queue of dispatch-and-wait steps.
///
/// Clones share the same queue. Dropping the last clone cancels the wait of
/// the item in flight.
#[derive(Clone)]
pub struct Queue {
    inner: Arc<QueueInner>,
}

impl Queue {
    pub fn new(correlator: Correlator, dispatcher: impl Dispatch + 'static) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState::default()),
                correlator,
                dispatcher: Arc::new(dispatcher),
            }),
        }
    }

    /// Add an item and start it if the queue is idle.
    ///
    /// Completion and failure sets are checked here, before the item is
    /// queued.
    pub fn enqueue(&self, item: impl Into<QueueItem>) -> Result<QueueTicket, ContractError> {
        let item = item.into();
        if item.awaits_completion() || item.timeout.is_some() {
            self.inner.correlator.check(&item.wait_spec())?;
        }

        let ticket = EventFuture::new();
        let (id, position) = {
            let mut state = self.inner.lock();
            let id = state.next_id();
            let position = insertion_index(
                state.items.iter().map(|entry| entry.item.priority),
                item.priority,
            );
            state.items.insert(
                position,
                Entry {
                    id,
                    item,
                    ticket: ticket.clone(),
                    in_flight: None,
                },
            );
            (id, position)
        };
        tracing::debug!(id, position, "item enqueued");

        let ticket = QueueTicket::new(id, ticket, &self.inner);
        self.inner.process();
        Ok(ticket)
    }

    /// Stop starting new items. Returns false if already paused.
    pub fn pause(&self) -> bool {
        let mut state = self.inner.lock();
        if state.run == RunState::Paused {
            return false;
        }
        state.run = RunState::Paused;
        tracing::debug!("queue paused");
        true
    }

    /// Lift a pause and start the next item. Returns false if not paused.
    pub fn resume(&self) -> bool {
        {
            let mut state = self.inner.lock();
            if state.run != RunState::Paused {
                return false;
            }
            state.run = RunState::Waiting;
        }
        tracing::debug!("queue resumed");
        self.inner.process();
        true
    }

    /// Remove an item by id. Returns false if no such item is queued.
    pub fn cancel(&self, id: u64) -> bool {
        self.inner.cancel(id)
    }

    pub fn state(&self) -> RunState {
        self.inner.lock().run
    }

    pub fn len(&self) -> usize {
        self.inner.lock().items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of the queued items in processing order
    pub fn ids(&self) -> Vec<u64> {
        self.inner.lock().items.iter().map(|entry| entry.id).collect()
    }

    /// Id of the item currently in flight
    pub fn in_flight(&self) -> Option<u64> {
        self.inner
            .lock()
            .items
            .iter()
            .find(|entry| entry.in_flight.is_some())
            .map(|entry| entry.id)
    }
}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.lock();
        f.debug_struct("Queue")
            .field("state", &state.run)
            .field("len", &state.items.len())
            .finish()
    }
}

impl QueueInner {
    fn lock(&self) -> std::sync::MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Start items until one stays in flight or the queue is empty or
    /// paused.
    ///
    /// Only one call runs the loop at a time; nested calls (from
    /// completions during dispatch, or from other threads) return at once
    /// and the running loop picks up their changes.
    fn process(self: &Arc<Self>) {
        {
            let mut state = self.lock();
            if state.draining {
                return;
            }
            state.draining = true;
        }
        while let Some((id, item)) = self.claim() {
            self.start(id, item);
        }
    }

    /// Mark the head item in flight, or release the loop if nothing can
    /// start.
    fn claim(&self) -> Option<(u64, QueueItem)> {
        let mut state = self.lock();
        let ready = state.run == RunState::Waiting
            && !state.items.is_empty()
            && !state.items.iter().any(|entry| entry.in_flight.is_some());
        if !ready {
            state.draining = false;
            return None;
        }
        let front = &mut state.items[0];
        front.in_flight = Some(Vec::new());
        let claimed = (front.id, front.item.clone());
        state.run = RunState::Active;
        Some(claimed)
    }

    fn start(self: &Arc<Self>, id: u64, item: QueueItem) {
        tracing::debug!(id, event_type = %item.start.event_type, "starting item");

        // Wait first so events emitted during dispatch are observed
        if item.awaits_completion() {
            let wait = self.correlator.start(item.wait_spec());
            if self.track(id, &wait) {
                self.watch(id, &wait);
            }
        }

        match self.dispatcher.dispatch(item.start.clone()) {
            Err(err) => {
                tracing::warn!(id, error = %err, "dispatch failed");
                self.complete(id, Err(WaitError::Dispatch(err)));
            }
            Ok(Dispatched::Pending(pending)) => {
                if self.track(id, &pending) {
                    self.watch(id, &pending);
                }
            }
            Ok(Dispatched::Event(event)) => {
                if !item.awaits_completion() {
                    self.complete(id, Ok(event));
                }
            }
        }
    }

    /// Attach a wait to an in-flight item. Cancels the wait if the item
    /// has already left the queue.
    fn track(&self, id: u64, wait: &EventFuture) -> bool {
        let tracked = {
            let mut state = self.lock();
            let slot = state
                .items
                .iter_mut()
                .find(|entry| entry.id == id)
                .and_then(|entry| entry.in_flight.as_mut());
            match slot {
                Some(waits) => {
                    waits.push(wait.clone());
                    true
                }
                None => false,
            }
        };
        if !tracked {
            wait.cancel();
        }
        tracked
    }

    fn watch(self: &Arc<Self>, id: u64, wait: &EventFuture) {
        let queue = Arc::downgrade(self);
        wait.on_settle(move |outcome| {
            if let Some(queue) = queue.upgrade() {
                queue.complete(id, outcome);
            }
        });
    }

    /// Settle an in-flight item and advance unless paused
    fn complete(self: &Arc<Self>, id: u64, outcome: Result<Event, WaitError>) {
        let (mut entry, paused) = {
            let mut state = self.lock();
            let Some(position) = state.position(id) else {
                return;
            };
            let entry = state.items.remove(position);
            let paused = state.run == RunState::Paused;
            if !paused {
                state.run = RunState::Waiting;
            }
            (entry, paused)
        };

        for wait in entry.in_flight.take().unwrap_or_default() {
            wait.cancel();
        }
        tracing::debug!(id, ok = outcome.is_ok(), "item settled");
        entry.ticket.settle(outcome);

        if !paused {
            self.process();
        }
    }

    fn cancel(self: &Arc<Self>, id: u64) -> bool {
        let entry = {
            let mut state = self.lock();
            let Some(position) = state.position(id) else {
                return false;
            };
            let entry = state.items.remove(position);
            if entry.in_flight.is_some() && state.run == RunState::Active {
                state.run = RunState::Waiting;
            }
            entry
        };

        let was_in_flight = entry.in_flight.is_some();
        for wait in entry.in_flight.into_iter().flatten() {
            wait.cancel();
        }
        tracing::debug!(id, in_flight = was_in_flight, "item canceled");

        self.process();
        true
    }
}

impl Drop for QueueInner {
    fn drop(&mut self) {
        let state = self.state.get_mut().unwrap_or_else(|e| e.into_inner());
        for entry in state.items.drain(..) {
            for wait in entry.in_flight.into_iter().flatten() {
                wait.cancel();
            }
        }
    }
}
