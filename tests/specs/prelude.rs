//! Shared harness for tether specs

#![allow(dead_code)]

pub use serde_json::json;
pub use std::sync::{Arc, Mutex};
pub use std::time::Duration;
pub use tether_adapters::{FakeDispatcher, TracedDispatcher};
pub use tether_core::{
    request_factory, Config, Correlation, ContractError, Event, EventDescriptor, EventFuture,
    EventType, Hub, Queue, QueueItem, QueueTicket, RunState, ValidationMode, WaitError, WaitSpec,
};

/// A hub over a fake host, with helpers for driving events through it
pub struct World {
    pub hub: Hub,
    pub host: FakeDispatcher,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        let host = FakeDispatcher::new();
        let hub = Hub::new(config, TracedDispatcher::new(host.clone()));
        host.connect(hub.registry());
        Self { hub, host }
    }

    /// Dispatch a bare event through the hub
    pub fn emit(&self, event_type: impl Into<EventType>) -> &Self {
        self.hub.dispatch(Event::new(event_type)).unwrap();
        self
    }

    /// Types the host has seen, in order
    pub fn dispatched(&self) -> Vec<String> {
        self.host
            .call_types()
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    /// Record every event of the given types into a shared log
    pub fn record(&self, event_types: &[&str]) -> Arc<Mutex<Vec<String>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&log);
        self.hub
            .subscribe(event_types.iter().copied())
            .unwrap()
            .add_listener(move |event| sink.lock().unwrap().push(event.event_type.to_string()));
        log
    }

    pub fn queue(&self) -> Queue {
        self.hub.queue()
    }
}

/// Assertions over anything that settles like an [`EventFuture`]
pub trait Settles {
    fn current(&self) -> Option<Result<Event, WaitError>>;

    fn resolved_with(&self, event_type: impl Into<EventType>) -> &Self {
        let expected = event_type.into();
        match self.current() {
            Some(Ok(event)) => assert_eq!(event.event_type, expected),
            other => panic!("expected resolution with '{expected}', got {other:?}"),
        }
        self
    }

    fn rejected_by(&self, event_type: impl Into<EventType>) -> &Self {
        let expected = event_type.into();
        match self.current() {
            Some(Err(err)) => assert_eq!(
                err.rejected_event().map(|e| e.event_type.clone()),
                Some(expected)
            ),
            other => panic!("expected rejection by '{expected}', got {other:?}"),
        }
        self
    }

    fn timed_out(&self) -> &Self {
        match self.current() {
            Some(Err(err)) => assert!(err.is_timeout(), "expected timeout, got {err}"),
            other => panic!("expected timeout, got {other:?}"),
        }
        self
    }

    fn still_pending(&self) -> &Self {
        let current = self.current();
        assert!(current.is_none(), "expected pending, got {current:?}");
        self
    }
}

impl Settles for EventFuture {
    fn current(&self) -> Option<Result<Event, WaitError>> {
        self.outcome()
    }
}

impl Settles for QueueTicket {
    fn current(&self) -> Option<Result<Event, WaitError>> {
        self.outcome()
    }
}

/// Wait item completing on `<name>/done` and failing on `<name>/failed`
pub fn job(name: &str) -> QueueItem {
    QueueItem::new(name)
        .complete_on([format!("{name}/done")])
        .fail_on([format!("{name}/failed")])
}

pub const NONE: [&str; 0] = [];
