// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Dashboard-facing views of tasks and the scheduler
//!
//! Property names match what dashboards already expect (`isComposed`,
//! `interruptBehavior`, ...). Nothing in the scheduler depends on this module
//! beyond producing a [`SchedulerSnapshot`].

use crate::error::SchedulerError;
use crate::scheduler::Scheduler;
use crate::task::TaskHandle;
use serde::Serialize;
use thiserror::Error;

/// Errors writing a telemetry property
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TelemetryError {
    #[error("unknown property: {0}")]
    Unknown(String),
    #[error("property {0} is read-only")]
    ReadOnly(String),
    #[error("property {name} expects a {expected}")]
    WrongType { name: String, expected: &'static str },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

/// A property value
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    String(String),
}

/// A published property and whether dashboards may write it
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub read_only: bool,
}

const PROPERTIES: [Property; 5] = [
    Property {
        name: "name",
        read_only: true,
    },
    Property {
        name: "running",
        read_only: false,
    },
    Property {
        name: "isComposed",
        read_only: true,
    },
    Property {
        name: "interruptBehavior",
        read_only: true,
    },
    Property {
        name: "runsWhenDisabled",
        read_only: true,
    },
];

/// Telemetry for one task as seen by one scheduler
pub struct TaskTelemetry {
    handle: TaskHandle,
    scheduler: Scheduler,
}

impl TaskTelemetry {
    pub fn new(handle: &TaskHandle, scheduler: &Scheduler) -> Self {
        Self {
            handle: handle.clone(),
            scheduler: scheduler.clone(),
        }
    }

    pub fn properties(&self) -> &'static [Property] {
        &PROPERTIES
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        let value = match name {
            "name" => Value::String(self.handle.name().to_string()),
            "running" => Value::Bool(self.scheduler.is_scheduled(&self.handle)),
            "isComposed" => Value::Bool(self.handle.is_composed()),
            "interruptBehavior" => {
                Value::String(self.handle.interruption_behavior().as_str().to_string())
            }
            "runsWhenDisabled" => Value::Bool(self.handle.runs_when_disabled()),
            _ => return None,
        };
        Some(value)
    }

    /// Write a property; only `running` is writable
    ///
    /// Setting `running` to true schedules the task, false cancels it. A task
    /// rejected by a `CancelIncoming` holder stays not running without error;
    /// scheduling errors such as a composed task are returned.
    pub fn set(&self, name: &str, value: Value) -> Result<(), TelemetryError> {
        let Some(property) = PROPERTIES.iter().find(|p| p.name == name) else {
            return Err(TelemetryError::Unknown(name.to_string()));
        };
        if property.read_only {
            return Err(TelemetryError::ReadOnly(name.to_string()));
        }
        let Value::Bool(running) = value else {
            return Err(TelemetryError::WrongType {
                name: name.to_string(),
                expected: "bool",
            });
        };
        if running {
            self.scheduler.schedule(&self.handle)?;
        } else {
            self.scheduler.cancel(&self.handle);
        }
        Ok(())
    }

    pub fn snapshot(&self) -> TaskSnapshot {
        TaskSnapshot {
            name: self.handle.name().to_string(),
            running: self.scheduler.is_scheduled(&self.handle),
            is_composed: self.handle.is_composed(),
            interrupt_behavior: self.handle.interruption_behavior().as_str(),
            runs_when_disabled: self.handle.runs_when_disabled(),
        }
    }
}

/// Point-in-time view of a task's published properties
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskSnapshot {
    pub name: String,
    pub running: bool,
    pub is_composed: bool,
    pub interrupt_behavior: &'static str,
    pub runs_when_disabled: bool,
}

/// Currently scheduled tasks, in admission order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SchedulerSnapshot {
    pub names: Vec<String>,
    pub ids: Vec<u64>,
}

impl SchedulerSnapshot {
    pub fn from_tasks(tasks: &[TaskHandle]) -> Self {
        Self {
            names: tasks.iter().map(|t| t.name().to_string()).collect(),
            ids: tasks.iter().map(|t| t.id().get()).collect(),
        }
    }
}

#[cfg(test)]
#[path = "telemetry_tests.rs"]
mod tests;
