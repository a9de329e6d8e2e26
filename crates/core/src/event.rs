// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Event types routed through the registry

use crate::descriptor::{resolve_types, EventDescriptor, EventFactory};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Identifier used to match events against subscriptions.
///
/// Matching is exact: a `Name("1")` never matches a `Code(1)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventType {
    Code(i64),
    Name(String),
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Code(code) => write!(f, "{}", code),
            EventType::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<&str> for EventType {
    fn from(name: &str) -> Self {
        EventType::Name(name.to_string())
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        EventType::Name(name)
    }
}

impl From<i64> for EventType {
    fn from(code: i64) -> Self {
        EventType::Code(code)
    }
}

/// Correlation metadata carried by a request event.
///
/// When a request event goes through [`Hub::dispatch`](crate::Hub::dispatch)
/// the hub waits for any of `resolve` (success) or `reject` (failure).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correlation {
    #[serde(default)]
    pub resolve: Vec<EventType>,
    #[serde(default)]
    pub reject: Vec<EventType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl Correlation {
    /// Build correlation metadata from any mix of descriptors
    pub fn new<R, J>(resolve: R, reject: J) -> Self
    where
        R: IntoIterator,
        R::Item: Into<EventDescriptor>,
        J: IntoIterator,
        J::Item: Into<EventDescriptor>,
    {
        Self {
            resolve: resolve_types(resolve),
            reject: resolve_types(reject),
            timeout_ms: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(timeout.as_millis() as u64);
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// A discrete occurrence with a type identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<Correlation>,
}

impl Event {
    pub fn new(event_type: impl Into<EventType>) -> Self {
        Self {
            event_type: event_type.into(),
            payload: serde_json::Value::Null,
            request: None,
        }
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Turn this event into a request that settles on a correlated response
    pub fn with_request(mut self, correlation: Correlation) -> Self {
        self.request = Some(correlation);
        self
    }

    pub fn is_request(&self) -> bool {
        self.request.is_some()
    }
}

/// Wrap an event factory so every event it produces carries `correlation`
pub fn request_factory(
    factory: impl Fn() -> Event + Send + Sync + 'static,
    correlation: Correlation,
) -> EventFactory {
    Arc::new(move || factory().with_request(correlation.clone()))
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
