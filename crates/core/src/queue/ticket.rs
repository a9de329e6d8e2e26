// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Handle returned by [`Queue::enqueue`](super::Queue::enqueue)

use super::QueueInner;
use crate::correlate::EventFuture;
use crate::error::WaitError;
use crate::event::Event;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};
use std::task::{Context, Poll};

/// Settlement of one queued item.
///
/// Resolves with the completion event (or the dispatched event for items
/// that do not wait), rejects with the failure or timeout error. An item
/// canceled while in flight never settles.
pub struct QueueTicket {
    id: u64,
    future: EventFuture,
    queue: Weak<QueueInner>,
}

impl QueueTicket {
    pub(super) fn new(id: u64, future: EventFuture, queue: &Arc<QueueInner>) -> Self {
        Self {
            id,
            future,
            queue: Arc::downgrade(queue),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// Remove the item from its queue. Returns false if it already left
    /// the queue or the queue is gone.
    pub fn cancel(&self) -> bool {
        match self.queue.upgrade() {
            Some(queue) => queue.cancel(self.id),
            None => false,
        }
    }

    pub fn outcome(&self) -> Option<Result<Event, WaitError>> {
        self.future.outcome()
    }

    pub fn on_settle(&self, callback: impl FnOnce(Result<Event, WaitError>) + Send + 'static) {
        self.future.on_settle(callback);
    }

    /// The underlying settle-once future
    pub fn future(&self) -> &EventFuture {
        &self.future
    }
}

impl Future for QueueTicket {
    type Output = Result<Event, WaitError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.future).poll(cx)
    }
}

impl fmt::Debug for QueueTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueueTicket")
            .field("id", &self.id)
            .field("future", &self.future)
            .finish()
    }
}
