// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for tasks, compositions and the scheduler

use thiserror::Error;

/// Lifecycle call in which task code panicked
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Initialize,
    Execute,
    IsFinished,
    End,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Phase::Initialize => "initialize",
            Phase::Execute => "execute",
            Phase::IsFinished => "is_finished",
            Phase::End => "end",
        };
        f.write_str(name)
    }
}

/// Errors reported by the scheduler
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("task {name} is part of a composition and cannot be scheduled independently")]
    Composed { name: String },
    #[error("task {name} is already running elsewhere")]
    AlreadyRunning { name: String },
    #[error("default task {task} must require its resource {resource}")]
    DefaultMissingRequirement { task: String, resource: String },
    #[error("task {task} panicked in {phase}: {message}")]
    TaskPanicked {
        task: String,
        phase: Phase,
        message: String,
    },
    #[error("{callback} panicked: {message}")]
    CallbackPanicked { callback: String, message: String },
}

/// Errors raised while building a composition
#[derive(Debug, Error)]
pub enum CompositionError {
    #[error("{first} and {second} both require {resources}; parallel compositions need disjoint requirements")]
    OverlappingRequirements {
        first: String,
        second: String,
        resources: String,
    },
    #[error("task {name} has already been composed")]
    AlreadyComposed { name: String },
    #[error("task {name} is running and cannot be composed")]
    Running { name: String },
}

/// Errors from mutating a task handle
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("requirements of composed task {name} can no longer change")]
    Composed { name: String },
}
