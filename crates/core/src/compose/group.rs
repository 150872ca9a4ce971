// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task groups: sequence, parallel, race and deadline

use super::{ensure_disjoint, Composition, GroupPolicy};
use crate::error::CompositionError;
use crate::resource::Requirements;
use crate::task::{InterruptionBehavior, Task};

macro_rules! group_policy {
    () => {
        fn requirements(&self) -> Requirements {
            self.policy.requirements.clone()
        }

        fn interruption_behavior(&self) -> InterruptionBehavior {
            self.policy.interruption
        }

        fn runs_when_disabled(&self) -> bool {
            self.policy.runs_when_disabled
        }
    };
}

fn unbox(children: Vec<Composition>) -> Vec<Box<dyn Task>> {
    children.into_iter().map(Composition::into_task).collect()
}

fn policy_of(children: &[Box<dyn Task>]) -> GroupPolicy {
    GroupPolicy::of(children.iter().map(|c| c.as_ref() as &dyn Task))
}

fn check_disjoint(children: &[Box<dyn Task>]) -> Result<(), CompositionError> {
    let members: Vec<&dyn Task> = children.iter().map(|c| c.as_ref() as &dyn Task).collect();
    ensure_disjoint(&members)
}

/// Runs children one after another
///
/// The next child is initialized on the same tick the previous one finishes
/// and first executes on the following tick.
pub struct Sequence {
    children: Vec<Box<dyn Task>>,
    current: usize,
    policy: GroupPolicy,
}

impl Sequence {
    pub fn new(children: Vec<Composition>) -> Self {
        let children = unbox(children);
        let policy = policy_of(&children);
        let current = children.len();
        Self {
            children,
            current,
            policy,
        }
    }
}

impl Task for Sequence {
    fn initialize(&mut self) {
        self.current = 0;
        if let Some(first) = self.children.first_mut() {
            first.initialize();
        }
    }

    fn execute(&mut self) {
        let Some(child) = self.children.get_mut(self.current) else {
            return;
        };
        child.execute();
        if child.is_finished() {
            child.end(false);
            self.current += 1;
            if let Some(next) = self.children.get_mut(self.current) {
                next.initialize();
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.current >= self.children.len()
    }

    fn end(&mut self, interrupted: bool) {
        if interrupted {
            if let Some(child) = self.children.get_mut(self.current) {
                child.end(true);
            }
        }
        self.current = self.children.len();
    }

    group_policy!();
}

/// Runs children together; finished once every child has finished
pub struct Parallel {
    children: Vec<Box<dyn Task>>,
    running: Vec<bool>,
    policy: GroupPolicy,
}

impl Parallel {
    pub fn new(children: Vec<Composition>) -> Result<Self, CompositionError> {
        let children = unbox(children);
        check_disjoint(&children)?;
        let policy = policy_of(&children);
        Ok(Self {
            running: vec![false; children.len()],
            children,
            policy,
        })
    }
}

impl Task for Parallel {
    fn initialize(&mut self) {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            child.initialize();
            *running = true;
        }
    }

    fn execute(&mut self) {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            if !*running {
                continue;
            }
            child.execute();
            if child.is_finished() {
                child.end(false);
                *running = false;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        !self.running.contains(&true)
    }

    fn end(&mut self, interrupted: bool) {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            if interrupted && *running {
                child.end(true);
            }
            *running = false;
        }
    }

    group_policy!();
}

/// Runs children together; finished as soon as any child has finished
///
/// Every child executes each tick. At the end, children that finished get
/// `end(false)` and the rest `end(true)`.
pub struct Race {
    children: Vec<Box<dyn Task>>,
    finished: Vec<bool>,
    policy: GroupPolicy,
}

impl Race {
    pub fn new(children: Vec<Composition>) -> Result<Self, CompositionError> {
        let children = unbox(children);
        check_disjoint(&children)?;
        let policy = policy_of(&children);
        Ok(Self {
            finished: vec![false; children.len()],
            children,
            policy,
        })
    }
}

impl Task for Race {
    fn initialize(&mut self) {
        for (child, finished) in self.children.iter_mut().zip(self.finished.iter_mut()) {
            *finished = false;
            child.initialize();
        }
    }

    fn execute(&mut self) {
        for (child, finished) in self.children.iter_mut().zip(self.finished.iter_mut()) {
            child.execute();
            if child.is_finished() {
                *finished = true;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        self.children.is_empty() || self.finished.contains(&true)
    }

    fn end(&mut self, _interrupted: bool) {
        for (child, finished) in self.children.iter_mut().zip(self.finished.iter()) {
            child.end(!*finished);
        }
    }

    group_policy!();
}

/// Runs a deadline child alongside others, interrupting them when it finishes
pub struct Deadline {
    children: Vec<Box<dyn Task>>,
    running: Vec<bool>,
    policy: GroupPolicy,
}

impl Deadline {
    pub fn new(deadline: Composition, others: Vec<Composition>) -> Result<Self, CompositionError> {
        let mut children = vec![deadline.into_task()];
        children.extend(unbox(others));
        check_disjoint(&children)?;
        let policy = policy_of(&children);
        Ok(Self {
            running: vec![false; children.len()],
            children,
            policy,
        })
    }
}

impl Task for Deadline {
    fn initialize(&mut self) {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            child.initialize();
            *running = true;
        }
    }

    fn execute(&mut self) {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            if !*running {
                continue;
            }
            child.execute();
            if child.is_finished() {
                child.end(false);
                *running = false;
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        !self.running.first().copied().unwrap_or(false)
    }

    fn end(&mut self, _interrupted: bool) {
        for (child, running) in self.children.iter_mut().zip(self.running.iter_mut()) {
            if *running {
                child.end(true);
            }
            *running = false;
        }
    }

    group_policy!();
}

#[cfg(test)]
#[path = "group_tests.rs"]
mod tests;
