// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Building-block tasks
//!
//! [`FunctionalTask`] covers everything expressible as closures; [`Wait`] and
//! [`WaitUntil`] block a sequence on time or a condition.

use crate::clock::SharedClock;
use crate::resource::Requirements;
use crate::task::Task;
use std::time::{Duration, Instant};

/// Task assembled from closures
///
/// With no finish predicate the task runs until interrupted.
pub struct FunctionalTask {
    name: String,
    requirements: Requirements,
    runs_when_disabled: bool,
    on_initialize: Option<Box<dyn FnMut()>>,
    on_execute: Option<Box<dyn FnMut()>>,
    on_end: Option<Box<dyn FnMut(bool)>>,
    finished: Option<Box<dyn FnMut() -> bool>>,
}

impl FunctionalTask {
    pub fn new() -> Self {
        Self {
            name: "FunctionalTask".to_string(),
            requirements: Requirements::new(),
            runs_when_disabled: false,
            on_initialize: None,
            on_execute: None,
            on_end: None,
            finished: None,
        }
    }

    /// Does nothing and finishes on its first tick
    pub fn noop() -> Self {
        Self::new().named("None").finished_when(|| true)
    }

    /// Runs `action` once at initialize and finishes on its first tick
    pub fn once(action: impl FnMut() + 'static) -> Self {
        Self::new()
            .named("RunOnce")
            .on_initialize(action)
            .finished_when(|| true)
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn requiring(mut self, requirements: Requirements) -> Self {
        self.requirements.extend(requirements);
        self
    }

    pub fn running_when_disabled(mut self, runs: bool) -> Self {
        self.runs_when_disabled = runs;
        self
    }

    pub fn on_initialize(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_initialize = Some(Box::new(f));
        self
    }

    pub fn on_execute(mut self, f: impl FnMut() + 'static) -> Self {
        self.on_execute = Some(Box::new(f));
        self
    }

    pub fn on_end(mut self, f: impl FnMut(bool) + 'static) -> Self {
        self.on_end = Some(Box::new(f));
        self
    }

    pub fn finished_when(mut self, f: impl FnMut() -> bool + 'static) -> Self {
        self.finished = Some(Box::new(f));
        self
    }
}

impl Default for FunctionalTask {
    fn default() -> Self {
        Self::new()
    }
}

impl Task for FunctionalTask {
    fn initialize(&mut self) {
        if let Some(f) = self.on_initialize.as_mut() {
            f();
        }
    }

    fn execute(&mut self) {
        if let Some(f) = self.on_execute.as_mut() {
            f();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.finished.as_mut().is_some_and(|f| f())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(f) = self.on_end.as_mut() {
            f(interrupted);
        }
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Finishes once a duration has elapsed since initialize
pub struct Wait {
    duration: Duration,
    clock: SharedClock,
    started: Option<Instant>,
}

impl Wait {
    pub fn new(duration: Duration, clock: SharedClock) -> Self {
        Self {
            duration,
            clock,
            started: None,
        }
    }
}

impl Task for Wait {
    fn initialize(&mut self) {
        self.started = Some(self.clock.now());
    }

    fn is_finished(&mut self) -> bool {
        self.started
            .is_some_and(|at| self.clock.since(at) >= self.duration)
    }

    fn end(&mut self, _interrupted: bool) {
        self.started = None;
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        format!("Wait({:?})", self.duration)
    }
}

/// Finishes once a condition is true
pub struct WaitUntil {
    condition: Box<dyn FnMut() -> bool>,
}

impl WaitUntil {
    pub fn new(condition: impl FnMut() -> bool + 'static) -> Self {
        Self {
            condition: Box::new(condition),
        }
    }
}

impl Task for WaitUntil {
    fn is_finished(&mut self) -> bool {
        (self.condition)()
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "tasks_tests.rs"]
mod tests;
