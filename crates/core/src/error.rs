// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types

use crate::config::ValidationMode;
use crate::event::{Event, EventType};
use thiserror::Error;

/// Input-contract violations, reported before any registry mutation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractError {
    #[error("{what} must contain at least one event type")]
    Empty { what: &'static str },
    #[error("{what} event '{event_type}' is duplicated")]
    Duplicate {
        what: &'static str,
        event_type: EventType,
    },
    #[error("event '{event_type}' is present in resolve and reject events")]
    Overlap { event_type: EventType },
    #[error("one of the resolve or reject event sets must contain elements")]
    NothingToWait,
    #[error("a timeout requires a running tokio runtime")]
    TimerUnavailable,
}

/// A wait settled by one of its reject events
#[derive(Debug, Clone, PartialEq, Error)]
#[error("Rejected event {}", .event.event_type)]
pub struct RejectError {
    pub event: Event,
}

impl RejectError {
    pub fn new(event: Event) -> Self {
        Self { event }
    }
}

/// A wait that saw no matching event before its deadline
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TimeoutError {
    pub message: String,
}

impl TimeoutError {
    pub const DEFAULT_MESSAGE: &'static str = "Timed out promise";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for TimeoutError {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MESSAGE)
    }
}

/// Errors from a dispatch collaborator
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Contract(#[from] ContractError),
    #[error("dispatch failed: {0}")]
    Failed(String),
}

/// Failure outcome of an [`EventFuture`](crate::EventFuture)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WaitError {
    #[error(transparent)]
    Rejected(#[from] RejectError),
    #[error(transparent)]
    Timeout(#[from] TimeoutError),
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl WaitError {
    /// The reject event, if this wait was settled by one
    pub fn rejected_event(&self) -> Option<&Event> {
        match self {
            WaitError::Rejected(err) => Some(&err.event),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, WaitError::Timeout(_))
    }
}

/// Errors from configuration handling
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("validation mode is locked to {current} after first use; cannot change to {requested}")]
    Locked {
        current: ValidationMode,
        requested: ValidationMode,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
