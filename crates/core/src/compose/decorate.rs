// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-child decorators and branching tasks

use super::GroupPolicy;
use crate::clock::SharedClock;
use crate::resource::Requirements;
use crate::task::{InterruptionBehavior, Task};
use std::fmt::Debug;
use std::time::{Duration, Instant};

/// Overrides policy of a task and observes its end
pub struct Wrapped {
    task: Box<dyn Task>,
    name: Option<String>,
    interruption: Option<InterruptionBehavior>,
    runs_when_disabled: Option<bool>,
    on_end: Option<Box<dyn FnMut(bool)>>,
}

impl Wrapped {
    pub fn new(task: Box<dyn Task>) -> Self {
        Self {
            task,
            name: None,
            interruption: None,
            runs_when_disabled: None,
            on_end: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn interruption_behavior(mut self, behavior: InterruptionBehavior) -> Self {
        self.interruption = Some(behavior);
        self
    }

    pub fn runs_when_disabled(mut self, runs: bool) -> Self {
        self.runs_when_disabled = Some(runs);
        self
    }

    /// Called with the `interrupted` flag after the inner task's `end`
    pub fn on_end(mut self, on_end: impl FnMut(bool) + 'static) -> Self {
        self.on_end = Some(Box::new(on_end));
        self
    }
}

impl Task for Wrapped {
    fn initialize(&mut self) {
        self.task.initialize();
    }

    fn execute(&mut self) {
        self.task.execute();
    }

    fn is_finished(&mut self) -> bool {
        self.task.is_finished()
    }

    fn end(&mut self, interrupted: bool) {
        self.task.end(interrupted);
        if let Some(on_end) = self.on_end.as_mut() {
            on_end(interrupted);
        }
    }

    fn requirements(&self) -> Requirements {
        self.task.requirements()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.interruption
            .unwrap_or_else(|| self.task.interruption_behavior())
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
            .unwrap_or_else(|| self.task.runs_when_disabled())
    }

    fn name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.task.name())
    }
}

enum Condition {
    Timeout {
        clock: SharedClock,
        duration: Duration,
        started: Option<Instant>,
    },
    Until(Box<dyn FnMut() -> bool>),
}

impl Condition {
    fn start(&mut self) {
        if let Condition::Timeout { clock, started, .. } = self {
            *started = Some(clock.now());
        }
    }

    fn met(&mut self) -> bool {
        match self {
            Condition::Timeout {
                clock,
                duration,
                started,
            } => started.is_some_and(|at| clock.since(at) >= *duration),
            Condition::Until(condition) => condition(),
        }
    }
}

/// Ends a task early when a deadline passes or a predicate turns true
///
/// The inner task is checked first; if it finishes on the same tick the
/// condition fires, it ends normally.
pub struct EndCondition {
    task: Box<dyn Task>,
    condition: Condition,
    task_finished: bool,
}

impl EndCondition {
    pub fn timeout(task: Box<dyn Task>, duration: Duration, clock: SharedClock) -> Self {
        Self {
            task,
            condition: Condition::Timeout {
                clock,
                duration,
                started: None,
            },
            task_finished: false,
        }
    }

    pub fn until(task: Box<dyn Task>, condition: impl FnMut() -> bool + 'static) -> Self {
        Self {
            task,
            condition: Condition::Until(Box::new(condition)),
            task_finished: false,
        }
    }
}

impl Task for EndCondition {
    fn initialize(&mut self) {
        self.task_finished = false;
        self.condition.start();
        self.task.initialize();
    }

    fn execute(&mut self) {
        self.task.execute();
    }

    fn is_finished(&mut self) -> bool {
        if self.task.is_finished() {
            self.task_finished = true;
            return true;
        }
        self.condition.met()
    }

    fn end(&mut self, interrupted: bool) {
        self.task.end(interrupted || !self.task_finished);
    }

    fn requirements(&self) -> Requirements {
        self.task.requirements()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.task.interruption_behavior()
    }

    fn runs_when_disabled(&self) -> bool {
        self.task.runs_when_disabled()
    }

    fn name(&self) -> String {
        self.task.name()
    }
}

/// Restarts its task whenever it finishes
///
/// A finished child is ended with `end(false)` right away and initialized
/// again on the next `execute`.
pub struct Repeat {
    task: Box<dyn Task>,
    ended: bool,
}

impl Repeat {
    pub fn new(task: Box<dyn Task>) -> Self {
        Self { task, ended: true }
    }
}

impl Task for Repeat {
    fn initialize(&mut self) {
        self.ended = false;
        self.task.initialize();
    }

    fn execute(&mut self) {
        if self.ended {
            self.ended = false;
            self.task.initialize();
        }
        self.task.execute();
        if self.task.is_finished() {
            self.task.end(false);
            self.ended = true;
        }
    }

    fn end(&mut self, interrupted: bool) {
        if !self.ended {
            self.task.end(interrupted);
            self.ended = true;
        }
    }

    fn requirements(&self) -> Requirements {
        self.task.requirements()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.task.interruption_behavior()
    }

    fn runs_when_disabled(&self) -> bool {
        self.task.runs_when_disabled()
    }

    fn name(&self) -> String {
        format!("Repeat({})", self.task.name())
    }
}

/// Picks one of two tasks when initialized
pub struct Conditional {
    on_true: Box<dyn Task>,
    on_false: Box<dyn Task>,
    condition: Box<dyn FnMut() -> bool>,
    selected: Option<bool>,
    policy: GroupPolicy,
}

impl Conditional {
    pub fn new(
        on_true: Box<dyn Task>,
        on_false: Box<dyn Task>,
        condition: impl FnMut() -> bool + 'static,
    ) -> Self {
        let policy = GroupPolicy::of([on_true.as_ref() as &dyn Task, on_false.as_ref() as &dyn Task]);
        Self {
            on_true,
            on_false,
            condition: Box::new(condition),
            selected: None,
            policy,
        }
    }

    fn branch(&mut self) -> Option<&mut Box<dyn Task>> {
        match self.selected? {
            true => Some(&mut self.on_true),
            false => Some(&mut self.on_false),
        }
    }
}

impl Task for Conditional {
    fn initialize(&mut self) {
        self.selected = Some((self.condition)());
        if let Some(branch) = self.branch() {
            branch.initialize();
        }
    }

    fn execute(&mut self) {
        if let Some(branch) = self.branch() {
            branch.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.branch().is_none_or(|branch| branch.is_finished())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(branch) = self.branch() {
            branch.end(interrupted);
        }
        self.selected = None;
    }

    fn requirements(&self) -> Requirements {
        self.policy.requirements.clone()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.policy.interruption
    }

    fn runs_when_disabled(&self) -> bool {
        self.policy.runs_when_disabled
    }
}

/// Picks a task by key when initialized
///
/// A key with no matching branch logs a warning and finishes immediately.
pub struct Select<K> {
    branches: Vec<(K, Box<dyn Task>)>,
    selector: Box<dyn FnMut() -> K>,
    selected: Option<usize>,
    policy: GroupPolicy,
}

impl<K: PartialEq + Debug> Select<K> {
    pub fn new(branches: Vec<(K, Box<dyn Task>)>, selector: impl FnMut() -> K + 'static) -> Self {
        let policy = GroupPolicy::of(branches.iter().map(|(_, task)| task.as_ref() as &dyn Task));
        Self {
            branches,
            selector: Box::new(selector),
            selected: None,
            policy,
        }
    }

    fn branch(&mut self) -> Option<&mut Box<dyn Task>> {
        let index = self.selected?;
        self.branches.get_mut(index).map(|(_, task)| task)
    }
}

impl<K: PartialEq + Debug> Task for Select<K> {
    fn initialize(&mut self) {
        let key = (self.selector)();
        self.selected = self.branches.iter().position(|(k, _)| *k == key);
        match self.branch() {
            Some(branch) => branch.initialize(),
            None => tracing::warn!(?key, "no branch for selected key"),
        }
    }

    fn execute(&mut self) {
        if let Some(branch) = self.branch() {
            branch.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.branch().is_none_or(|branch| branch.is_finished())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(branch) = self.branch() {
            branch.end(interrupted);
        }
        self.selected = None;
    }

    fn requirements(&self) -> Requirements {
        self.policy.requirements.clone()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.policy.interruption
    }

    fn runs_when_disabled(&self) -> bool {
        self.policy.runs_when_disabled
    }

    fn name(&self) -> String {
        "Select".to_string()
    }
}

#[cfg(test)]
#[path = "decorate_tests.rs"]
mod tests;
