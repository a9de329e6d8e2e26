// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dispatch collaborator
//!
//! The host mechanism that actually delivers an event. The queue calls it to
//! run the start event of its head item; the hub wraps one to add
//! correlation.

use crate::correlate::EventFuture;
use crate::error::DispatchError;
use crate::event::Event;

/// Result of dispatching an event
#[derive(Debug, Clone)]
pub enum Dispatched {
    /// The event as the host saw it
    Event(Event),
    /// The dispatch itself produced a pending outcome
    Pending(EventFuture),
}

impl Dispatched {
    pub fn is_pending(&self) -> bool {
        matches!(self, Dispatched::Pending(_))
    }

    pub fn into_future(self) -> Option<EventFuture> {
        match self {
            Dispatched::Pending(future) => Some(future),
            Dispatched::Event(_) => None,
        }
    }

    pub fn into_event(self) -> Option<Event> {
        match self {
            Dispatched::Event(event) => Some(event),
            Dispatched::Pending(_) => None,
        }
    }
}

/// Delivers events to the host.
///
/// Dispatch is synchronous; anything that completes later is reported as
/// [`Dispatched::Pending`].
pub trait Dispatch: Send + Sync {
    fn dispatch(&self, event: Event) -> Result<Dispatched, DispatchError>;
}

impl<F> Dispatch for F
where
    F: Fn(Event) -> Result<Dispatched, DispatchError> + Send + Sync,
{
    fn dispatch(&self, event: Event) -> Result<Dispatched, DispatchError> {
        self(event)
    }
}
