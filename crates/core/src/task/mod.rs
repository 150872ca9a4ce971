// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task lifecycle
//!
//! A task is a unit of work with a declared requirement set. Once admitted by
//! the scheduler it moves through a fixed state machine:
//!
//! - `initialize` exactly once
//! - `execute` then `is_finished` once per tick
//! - `end(interrupted)` exactly once, then its resources are released
//!
//! Combinators implement the same trait by forwarding to the tasks they own.

mod handle;
mod stepper;

pub use handle::TaskHandle;
pub use stepper::{run_to_completion, StepIter};

use crate::resource::Requirements;
use serde::Serialize;

/// How a running task reacts when an incoming task needs one of its resources
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum InterruptionBehavior {
    /// The running task is ended with `end(true)` and the incoming task is admitted
    #[default]
    CancelSelf,
    /// The running task keeps its resources and the incoming task is not scheduled
    CancelIncoming,
}

impl InterruptionBehavior {
    /// Name used by dashboards
    pub fn as_str(self) -> &'static str {
        match self {
            InterruptionBehavior::CancelSelf => "kCancelSelf",
            InterruptionBehavior::CancelIncoming => "kCancelIncoming",
        }
    }
}

impl std::fmt::Display for InterruptionBehavior {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A schedulable unit of work
///
/// Every method has a default so simple tasks only override what they need.
/// Lifecycle calls for one scheduled instance never interleave.
pub trait Task {
    /// Called once when the task is admitted
    fn initialize(&mut self) {}

    /// Called once per tick while the task is running
    fn execute(&mut self) {}

    /// Queried once per tick, after `execute`
    fn is_finished(&mut self) -> bool {
        false
    }

    /// Called once when the task finishes (`false`) or is cancelled (`true`)
    fn end(&mut self, _interrupted: bool) {}

    /// Resources this task claims while running
    fn requirements(&self) -> Requirements {
        Requirements::new()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        InterruptionBehavior::CancelSelf
    }

    /// Whether the task keeps running while the robot is disabled
    fn runs_when_disabled(&self) -> bool {
        false
    }

    fn name(&self) -> String {
        short_type_name(std::any::type_name::<Self>())
    }
}

impl<T: Task + ?Sized> Task for Box<T> {
    fn initialize(&mut self) {
        (**self).initialize();
    }

    fn execute(&mut self) {
        (**self).execute();
    }

    fn is_finished(&mut self) -> bool {
        (**self).is_finished()
    }

    fn end(&mut self, interrupted: bool) {
        (**self).end(interrupted);
    }

    fn requirements(&self) -> Requirements {
        (**self).requirements()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        (**self).interruption_behavior()
    }

    fn runs_when_disabled(&self) -> bool {
        (**self).runs_when_disabled()
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// True iff the two tasks share no resource
pub fn requirements_disjoint(a: &dyn Task, b: &dyn Task) -> bool {
    a.requirements().is_disjoint(&b.requirements())
}

/// `my_crate::tasks::Wait<Foo>` -> `Wait`
fn short_type_name(full: &str) -> String {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base).to_string()
}

#[cfg(test)]
#[path = "task_tests.rs"]
mod tests;
