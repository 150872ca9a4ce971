// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Scheduler configuration
//!
//! Loaded from TOML, durations in humantime form:
//!
//! ```toml
//! period = "20ms"
//! warn_on_overrun = true
//! start_disabled = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default control-loop period
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(20);

/// Errors loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Scheduler configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Expected time between ticks; a tick that takes longer is an overrun
    #[serde(with = "humantime_serde")]
    pub period: Duration,
    /// Log a warning when a tick overruns the period
    pub warn_on_overrun: bool,
    /// Start in disabled mode (only runs-when-disabled tasks are admitted)
    pub start_disabled: bool,
}

impl SchedulerConfig {
    pub fn new() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            warn_on_overrun: true,
            start_disabled: false,
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn with_overrun_warnings(mut self, enabled: bool) -> Self {
        self.warn_on_overrun = enabled;
        self
    }

    pub fn with_start_disabled(mut self, disabled: bool) -> Self {
        self.start_disabled = disabled;
        self
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SchedulerConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.period.is_zero() {
            return Err(ConfigError::Invalid("period must be greater than zero".into()));
        }
        Ok(())
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
