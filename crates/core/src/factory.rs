// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shorthand constructors returning [`Composition`]s

use crate::clock::{SharedClock, SystemClock};
use crate::compose::{
    Composition, Conditional, Deadline, Deferred, Fork, Parallel, Race, Select, Sequence,
};
use crate::error::CompositionError;
use crate::resource::Requirements;
use crate::tasks::{FunctionalTask, Wait, WaitUntil};
use crate::task::TaskHandle;
use std::fmt::Debug;
use std::time::Duration;

/// Does nothing and finishes immediately
pub fn none() -> Composition {
    Composition::new(FunctionalTask::noop())
}

/// Holds `requirements` and does nothing until interrupted
pub fn idle(requirements: Requirements) -> Composition {
    Composition::new(FunctionalTask::new().named("Idle").requiring(requirements))
}

pub fn run_once(action: impl FnMut() + 'static, requirements: Requirements) -> Composition {
    Composition::new(FunctionalTask::once(action).requiring(requirements))
}

/// Calls `action` every tick until interrupted
pub fn run(action: impl FnMut() + 'static, requirements: Requirements) -> Composition {
    Composition::new(
        FunctionalTask::new()
            .named("Run")
            .on_execute(action)
            .requiring(requirements),
    )
}

/// Calls `start` at initialize and `end` when interrupted
pub fn start_end(
    start: impl FnMut() + 'static,
    mut end: impl FnMut() + 'static,
    requirements: Requirements,
) -> Composition {
    Composition::new(
        FunctionalTask::new()
            .named("StartEnd")
            .on_initialize(start)
            .on_end(move |_| end())
            .requiring(requirements),
    )
}

pub fn run_end(
    run: impl FnMut() + 'static,
    mut end: impl FnMut() + 'static,
    requirements: Requirements,
) -> Composition {
    Composition::new(
        FunctionalTask::new()
            .named("RunEnd")
            .on_execute(run)
            .on_end(move |_| end())
            .requiring(requirements),
    )
}

pub fn start_run(
    start: impl FnMut() + 'static,
    run: impl FnMut() + 'static,
    requirements: Requirements,
) -> Composition {
    Composition::new(
        FunctionalTask::new()
            .named("StartRun")
            .on_initialize(start)
            .on_execute(run)
            .requiring(requirements),
    )
}

/// Prints a line to stdout and finishes
pub fn print(message: impl Into<String>) -> Composition {
    let message = message.into();
    Composition::new(
        FunctionalTask::once(move || println!("{message}"))
            .named("Print")
            .running_when_disabled(true),
    )
}

/// Waits on the system clock
pub fn wait(duration: Duration) -> Composition {
    wait_on(duration, SystemClock::shared())
}

pub fn wait_on(duration: Duration, clock: SharedClock) -> Composition {
    Composition::new(Wait::new(duration, clock))
}

pub fn wait_until(condition: impl FnMut() -> bool + 'static) -> Composition {
    Composition::new(WaitUntil::new(condition))
}

/// Runs `on_true` or `on_false` depending on `condition` at start
pub fn either(
    on_true: Composition,
    on_false: Composition,
    condition: impl FnMut() -> bool + 'static,
) -> Composition {
    Composition::new(Conditional::new(
        on_true.into_task(),
        on_false.into_task(),
        condition,
    ))
}

pub fn select<K: PartialEq + Debug + 'static>(
    branches: Vec<(K, Composition)>,
    selector: impl FnMut() -> K + 'static,
) -> Composition {
    let branches = branches
        .into_iter()
        .map(|(key, task)| (key, task.into_task()))
        .collect();
    Composition::new(Select::new(branches, selector))
}

/// Builds the task when it starts
pub fn defer(
    factory: impl FnMut() -> Composition + 'static,
    requirements: Requirements,
) -> Composition {
    Composition::new(Deferred::new(factory, requirements))
}

/// Schedules `tasks` on the thread's default scheduler and finishes
pub fn fork(tasks: Vec<TaskHandle>) -> Composition {
    Composition::new(Fork::new(tasks))
}

pub fn sequence(tasks: Vec<Composition>) -> Composition {
    Composition::new(Sequence::new(tasks))
}

pub fn repeating_sequence(tasks: Vec<Composition>) -> Composition {
    sequence(tasks).repeatedly()
}

pub fn parallel(tasks: Vec<Composition>) -> Result<Composition, CompositionError> {
    Ok(Composition::new(Parallel::new(tasks)?))
}

pub fn race(tasks: Vec<Composition>) -> Result<Composition, CompositionError> {
    Ok(Composition::new(Race::new(tasks)?))
}

pub fn deadline(
    deadline: Composition,
    others: Vec<Composition>,
) -> Result<Composition, CompositionError> {
    Ok(Composition::new(Deadline::new(deadline, others)?))
}

#[cfg(test)]
#[path = "factory_tests.rs"]
mod tests;
