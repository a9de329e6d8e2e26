// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tether-core: request/response semantics over fire-and-forget events
//!
//! This crate provides:
//! - A subscription registry that routes typed events to listener groups
//! - A correlation engine that turns resolve/reject event sets into a
//!   cancelable, optionally time-bounded future
//! - A priority queue that runs "dispatch, then wait for completion" steps
//!   one at a time
//! - A `Hub` that composes the three around a host dispatcher

pub mod config;
pub mod correlate;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod hub;
pub mod queue;
pub mod registry;
mod validate;

pub use config::{Config, ValidationMode};
pub use correlate::{Correlator, EventFuture, WaitSpec};
pub use descriptor::{EventDescriptor, EventFactory};
pub use dispatch::{Dispatch, Dispatched};
pub use error::{ConfigError, ContractError, DispatchError, RejectError, TimeoutError, WaitError};
pub use event::{request_factory, Correlation, Event, EventType};
pub use hub::Hub;
pub use queue::{Queue, QueueItem, QueueTicket, RunState};
pub use registry::{Listener, Registry, Subscription};
