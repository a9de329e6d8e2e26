// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Descriptor resolution
//!
//! Public APIs accept event types as a literal identifier, a concrete event,
//! or a zero-argument factory. Everything is resolved to an [`EventType`]
//! here so the registry, correlator and queue only see canonical identifiers.

use crate::event::{Event, EventType};
use std::fmt;
use std::sync::Arc;

/// A zero-argument event factory
pub type EventFactory = Arc<dyn Fn() -> Event + Send + Sync>;

/// Anything that names an event type
#[derive(Clone)]
pub enum EventDescriptor {
    Type(EventType),
    Event(Event),
    Factory(EventFactory),
}

impl EventDescriptor {
    pub fn factory(factory: impl Fn() -> Event + Send + Sync + 'static) -> Self {
        EventDescriptor::Factory(Arc::new(factory))
    }

    /// Canonical identifier; factories are invoked to read the produced type
    pub fn event_type(&self) -> EventType {
        match self {
            EventDescriptor::Type(event_type) => event_type.clone(),
            EventDescriptor::Event(event) => event.event_type.clone(),
            EventDescriptor::Factory(factory) => factory().event_type,
        }
    }

    /// Concrete event; a bare identifier becomes an event without payload
    pub fn to_event(&self) -> Event {
        match self {
            EventDescriptor::Type(event_type) => Event::new(event_type.clone()),
            EventDescriptor::Event(event) => event.clone(),
            EventDescriptor::Factory(factory) => factory(),
        }
    }
}

impl fmt::Debug for EventDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventDescriptor::Type(event_type) => f.debug_tuple("Type").field(event_type).finish(),
            EventDescriptor::Event(event) => f.debug_tuple("Event").field(event).finish(),
            EventDescriptor::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

impl From<EventType> for EventDescriptor {
    fn from(event_type: EventType) -> Self {
        EventDescriptor::Type(event_type)
    }
}

impl From<&EventType> for EventDescriptor {
    fn from(event_type: &EventType) -> Self {
        EventDescriptor::Type(event_type.clone())
    }
}

impl From<&str> for EventDescriptor {
    fn from(name: &str) -> Self {
        EventDescriptor::Type(name.into())
    }
}

impl From<String> for EventDescriptor {
    fn from(name: String) -> Self {
        EventDescriptor::Type(name.into())
    }
}

impl From<i64> for EventDescriptor {
    fn from(code: i64) -> Self {
        EventDescriptor::Type(code.into())
    }
}

impl From<Event> for EventDescriptor {
    fn from(event: Event) -> Self {
        EventDescriptor::Event(event)
    }
}

impl From<EventFactory> for EventDescriptor {
    fn from(factory: EventFactory) -> Self {
        EventDescriptor::Factory(factory)
    }
}

/// Resolve a list of descriptors, preserving order and duplicates
pub(crate) fn resolve_types<I>(descriptors: I) -> Vec<EventType>
where
    I: IntoIterator,
    I::Item: Into<EventDescriptor>,
{
    descriptors
        .into_iter()
        .map(|descriptor| descriptor.into().event_type())
        .collect()
}
