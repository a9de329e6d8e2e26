// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Validation configuration
//!
//! A [`Config`] is handed to every component constructor. The first
//! constructor that reads it locks the validation mode; later attempts to
//! change it to a different value fail.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Whether input-shape checks run at call time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationMode {
    /// Check every event-type set and argument when it is passed in
    #[default]
    Runtime,
    /// Inputs are trusted; skip the checks
    CompileTime,
}

impl ValidationMode {
    pub fn is_runtime(self) -> bool {
        self == ValidationMode::Runtime
    }
}

impl fmt::Display for ValidationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationMode::Runtime => write!(f, "runtime"),
            ValidationMode::CompileTime => write!(f, "compile-time"),
        }
    }
}

/// On-disk representation
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    validation: ValidationMode,
}

#[derive(Debug, Default)]
struct ConfigState {
    validation: ValidationMode,
    locked: bool,
}

/// Shared, set-once configuration handle
#[derive(Debug, Clone, Default)]
pub struct Config {
    state: Arc<Mutex<ConfigState>>,
}

impl Config {
    pub fn new(validation: ValidationMode) -> Self {
        Self {
            state: Arc::new(Mutex::new(ConfigState {
                validation,
                locked: false,
            })),
        }
    }

    /// Parse a TOML document such as `validation = "compile-time"`
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(source)?;
        Ok(Self::new(file.validation))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Change the validation mode.
    ///
    /// Once a component has been built from this config, only the value
    /// already in effect is accepted.
    pub fn set_validation(&self, validation: ValidationMode) -> Result<(), ConfigError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if state.locked && state.validation != validation {
            return Err(ConfigError::Locked {
                current: state.validation,
                requested: validation,
            });
        }
        state.validation = validation;
        Ok(())
    }

    /// Current validation mode, without locking it
    pub fn validation(&self) -> ValidationMode {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .validation
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).locked
    }

    /// Read the validation mode for a component and lock it in
    pub(crate) fn acquire(&self) -> ValidationMode {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if !state.locked {
            tracing::debug!(validation = %state.validation, "validation mode locked");
        }
        state.locked = true;
        state.validation
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
