// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! tickwork-core: cooperative task scheduling for fixed-rate control loops
//!
//! This crate provides:
//! - Resources and the tasks that claim them
//! - Combinators (sequence, parallel, race, deadline, repeat, proxy, ...)
//! - A tick-driven scheduler that arbitrates resource conflicts
//! - Triggers that schedule tasks on condition edges
//! - Telemetry views for dashboards

pub mod clock;
pub mod config;
pub mod error;
pub mod id;
pub mod probe;
pub mod resource;

// Core model (order matters for dependencies)
pub mod task;
pub mod tasks;
pub mod compose;
pub mod factory;
pub mod scheduler;
pub mod trigger;
pub mod telemetry;

// Re-exports
pub use clock::{Clock, FakeClock, SharedClock, SystemClock};
pub use compose::{Composition, ProxySource};
pub use config::{ConfigError, SchedulerConfig};
pub use error::{CompositionError, Phase, SchedulerError, TaskError};
pub use id::{ResourceId, TaskId};
pub use resource::{Requirements, Resource};
pub use scheduler::{LifecycleEvent, Mode, Scheduler, WeakScheduler};
pub use task::{
    requirements_disjoint, run_to_completion, InterruptionBehavior, StepIter, Task, TaskHandle,
};
pub use tasks::{FunctionalTask, Wait, WaitUntil};
pub use telemetry::{SchedulerSnapshot, TaskSnapshot, TaskTelemetry, TelemetryError};
pub use trigger::{Debounce, Trigger};
