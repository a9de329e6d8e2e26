// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Input-contract checks shared by the registry, correlator and queue

use crate::error::ContractError;
use crate::event::EventType;
use std::collections::HashSet;

pub(crate) fn non_empty(types: &[EventType], what: &'static str) -> Result<(), ContractError> {
    if types.is_empty() {
        return Err(ContractError::Empty { what });
    }
    Ok(())
}

pub(crate) fn unique(types: &[EventType], what: &'static str) -> Result<(), ContractError> {
    let mut seen = HashSet::with_capacity(types.len());
    for event_type in types {
        if !seen.insert(event_type) {
            return Err(ContractError::Duplicate {
                what,
                event_type: event_type.clone(),
            });
        }
    }
    Ok(())
}

pub(crate) fn disjoint(resolve: &[EventType], reject: &[EventType]) -> Result<(), ContractError> {
    let resolve: HashSet<&EventType> = resolve.iter().collect();
    match reject.iter().find(|event_type| resolve.contains(event_type)) {
        Some(event_type) => Err(ContractError::Overlap {
            event_type: event_type.clone(),
        }),
        None => Ok(()),
    }
}

/// Checks for a resolve/reject pair
pub(crate) fn wait_sets(resolve: &[EventType], reject: &[EventType]) -> Result<(), ContractError> {
    unique(resolve, "resolve")?;
    unique(reject, "reject")?;
    disjoint(resolve, reject)?;
    if resolve.is_empty() && reject.is_empty() {
        return Err(ContractError::NothingToWait);
    }
    Ok(())
}
