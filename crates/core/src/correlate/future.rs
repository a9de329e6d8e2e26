// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Cancelable, settle-once future

use crate::error::WaitError;
use crate::event::Event;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, Weak};
use std::task::{Context, Poll, Waker};

type SettleCallback = Box<dyn FnOnce(Result<Event, WaitError>) + Send>;
type Teardown = Box<dyn FnOnce() + Send>;

enum State {
    Pending {
        callbacks: Vec<SettleCallback>,
        wakers: Vec<Waker>,
    },
    Settled(Result<Event, WaitError>),
    Canceled,
}

struct Shared {
    state: Mutex<State>,
    /// Releases subscriptions and timers; taken exactly once
    teardown: Mutex<Option<Teardown>>,
}

/// Outcome of a correlated wait.
///
/// Settles at most once: resolved with the matching event, or rejected with
/// a [`WaitError`]. After [`cancel`](Self::cancel) it never settles, and
/// awaiting it never completes. Clones share the same state; dropping the
/// last clone of a pending future cancels it.
#[derive(Clone)]
pub struct EventFuture {
    shared: Arc<Shared>,
}

impl EventFuture {
    pub(crate) fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(State::Pending {
                    callbacks: Vec::new(),
                    wakers: Vec::new(),
                }),
                teardown: Mutex::new(None),
            }),
        }
    }

    /// An already-settled future
    pub fn settled(outcome: Result<Event, WaitError>) -> Self {
        let future = Self::new();
        future.settle(outcome);
        future
    }

    /// Register a callback for settlement.
    ///
    /// Runs synchronously when the future settles, or immediately if it
    /// already has. Dropped without running if the future is canceled.
    pub fn on_settle(&self, callback: impl FnOnce(Result<Event, WaitError>) + Send + 'static) {
        let outcome = {
            let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
            match &mut *state {
                State::Pending { callbacks, .. } => {
                    callbacks.push(Box::new(callback));
                    return;
                }
                State::Settled(outcome) => outcome.clone(),
                State::Canceled => return,
            }
        };
        callback(outcome);
    }

    /// Stop waiting. Releases subscriptions and the timer; registered
    /// callbacks never run. Returns false if the future had already settled
    /// or been canceled.
    pub fn cancel(&self) -> bool {
        let previous = {
            let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
            if !matches!(*state, State::Pending { .. }) {
                None
            } else {
                Some(std::mem::replace(&mut *state, State::Canceled))
            }
        };
        self.teardown();
        // callbacks are dropped here, outside the lock
        previous.is_some()
    }

    /// Non-blocking peek at the outcome
    pub fn outcome(&self) -> Option<Result<Event, WaitError>> {
        match &*self.shared.state.lock().unwrap_or_else(|e| e.into_inner()) {
            State::Settled(outcome) => Some(outcome.clone()),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(
            *self.shared.state.lock().unwrap_or_else(|e| e.into_inner()),
            State::Pending { .. }
        )
    }

    pub fn is_settled(&self) -> bool {
        matches!(
            *self.shared.state.lock().unwrap_or_else(|e| e.into_inner()),
            State::Settled(_)
        )
    }

    pub fn is_canceled(&self) -> bool {
        matches!(
            *self.shared.state.lock().unwrap_or_else(|e| e.into_inner()),
            State::Canceled
        )
    }

    /// Settle the future if it is still pending.
    ///
    /// Teardown runs before any settlement callback.
    pub(crate) fn settle(&self, outcome: Result<Event, WaitError>) -> bool {
        let previous = {
            let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
            if !matches!(*state, State::Pending { .. }) {
                return false;
            }
            std::mem::replace(&mut *state, State::Settled(outcome.clone()))
        };
        self.teardown();

        if let State::Pending { callbacks, wakers } = previous {
            for callback in callbacks {
                callback(outcome.clone());
            }
            for waker in wakers {
                waker.wake();
            }
        }
        true
    }

    pub(crate) fn downgrade(&self) -> WeakEventFuture {
        WeakEventFuture {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// Install the release closure. Runs it immediately if the future is
    /// no longer pending.
    pub(crate) fn install_teardown(&self, teardown: Teardown) {
        let mut slot = self
            .shared
            .teardown
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        if self.is_pending() {
            *slot = Some(teardown);
            return;
        }
        drop(slot);
        teardown();
    }

    fn teardown(&self) {
        let teardown = self
            .shared
            .teardown
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let teardown = self
            .teardown
            .get_mut()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(teardown) = teardown {
            teardown();
        }
    }
}

/// Settling handle held by listeners and timers.
///
/// Does not keep the future alive, so an abandoned wait releases its
/// subscriptions.
pub(crate) struct WeakEventFuture {
    shared: Weak<Shared>,
}

impl WeakEventFuture {
    /// Settle the future if any handle to it is still alive
    pub(crate) fn settle(&self, outcome: Result<Event, WaitError>) -> bool {
        match self.shared.upgrade() {
            Some(shared) => EventFuture { shared }.settle(outcome),
            None => false,
        }
    }
}

impl Future for EventFuture {
    type Output = Result<Event, WaitError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.shared.state.lock().unwrap_or_else(|e| e.into_inner());
        match &mut *state {
            State::Settled(outcome) => Poll::Ready(outcome.clone()),
            State::Pending { wakers, .. } => {
                if !wakers.iter().any(|w| w.will_wake(cx.waker())) {
                    wakers.push(cx.waker().clone());
                }
                Poll::Pending
            }
            State::Canceled => Poll::Pending,
        }
    }
}

impl fmt::Debug for EventFuture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match &*self.shared.state.lock().unwrap_or_else(|e| e.into_inner()) {
            State::Pending { .. } => "pending",
            State::Settled(Ok(_)) => "resolved",
            State::Settled(Err(_)) => "rejected",
            State::Canceled => "canceled",
        };
        f.debug_struct("EventFuture").field("state", &state).finish()
    }
}

#[cfg(test)]
#[path = "future_tests.rs"]
mod tests;
