// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared, schedulable task handle

use super::{InterruptionBehavior, Task};
use crate::error::{CompositionError, SchedulerError, TaskError};
use crate::id::TaskId;
use crate::resource::{Requirements, Resource};
use crate::scheduler::Scheduler;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// A task that can be scheduled, cancelled and queried by identity
///
/// Clones refer to the same task. Which scheduler runs it is a question for
/// that [`Scheduler`]; the handle only records that some scheduler or
/// composition currently owns a lifecycle, so two can never overlap. Per-instance policy
/// (name, interruption behavior, runs-when-disabled, requirements) is read from
/// the task once, when the handle is created.
#[derive(Clone)]
pub struct TaskHandle {
    inner: Rc<HandleInner>,
}

struct HandleInner {
    id: TaskId,
    name: String,
    interruption: InterruptionBehavior,
    runs_when_disabled: bool,
    requirements: RefCell<Requirements>,
    composed: Cell<bool>,
    /// Between a lifecycle's `initialize` and its `end`
    running: Cell<bool>,
    task: RefCell<Box<dyn Task>>,
}

impl TaskHandle {
    pub fn new(task: impl Task + 'static) -> Self {
        Self::from_boxed(Box::new(task))
    }

    pub fn from_boxed(task: Box<dyn Task>) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                id: TaskId::next(),
                name: task.name(),
                interruption: task.interruption_behavior(),
                runs_when_disabled: task.runs_when_disabled(),
                requirements: RefCell::new(task.requirements()),
                composed: Cell::new(false),
                running: Cell::new(false),
                task: RefCell::new(task),
            }),
        }
    }

    pub fn id(&self) -> TaskId {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn requirements(&self) -> Requirements {
        self.inner.requirements.borrow().clone()
    }

    pub fn has_requirement(&self, resource: &Resource) -> bool {
        self.inner.requirements.borrow().contains(resource)
    }

    /// Claim additional resources; fails once the task has been composed
    pub fn add_requirements(
        &self,
        resources: impl IntoIterator<Item = Resource>,
    ) -> Result<(), TaskError> {
        if self.is_composed() {
            return Err(TaskError::Composed {
                name: self.inner.name.clone(),
            });
        }
        self.inner.requirements.borrow_mut().extend(resources);
        Ok(())
    }

    pub fn interruption_behavior(&self) -> InterruptionBehavior {
        self.inner.interruption
    }

    pub fn runs_when_disabled(&self) -> bool {
        self.inner.runs_when_disabled
    }

    /// True once this task has been folded into a composition
    pub fn is_composed(&self) -> bool {
        self.inner.composed.get()
    }

    pub(crate) fn mark_composed(&self) -> Result<(), CompositionError> {
        if self.inner.composed.replace(true) {
            return Err(CompositionError::AlreadyComposed {
                name: self.inner.name.clone(),
            });
        }
        Ok(())
    }

    /// Release a composed task so it can be scheduled or composed again
    ///
    /// A composition that still holds the task keeps driving it; whichever of
    /// the two starts a lifecycle first owns it until `end`.
    pub fn clear_composed(&self) {
        self.inner.composed.set(false);
    }

    /// True while a scheduler or composition is between `initialize` and `end`
    pub fn is_running(&self) -> bool {
        self.inner.running.get()
    }

    /// Claim the lifecycle; false if another owner already holds it
    pub(crate) fn begin_run(&self) -> bool {
        !self.inner.running.replace(true)
    }

    pub(crate) fn end_run(&self) {
        self.inner.running.set(false);
    }

    /// Whether one of this task's lifecycle calls is on the stack right now
    pub fn is_busy(&self) -> bool {
        self.inner.task.try_borrow_mut().is_err()
    }

    /// Run a lifecycle call; `None` if the task is already mid-call
    pub(crate) fn try_lifecycle<R>(&self, f: impl FnOnce(&mut dyn Task) -> R) -> Option<R> {
        let mut task = self.inner.task.try_borrow_mut().ok()?;
        Some(f(&mut **task))
    }

    pub fn ptr_eq(&self, other: &TaskHandle) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Schedule on the thread's default scheduler
    pub fn schedule(&self) -> Result<(), SchedulerError> {
        Scheduler::instance().schedule(self)
    }

    /// Cancel on the thread's default scheduler; a no-op if not scheduled
    pub fn cancel(&self) {
        Scheduler::instance().cancel(self);
    }

    /// Whether the thread's default scheduler is running this task
    pub fn is_scheduled(&self) -> bool {
        Scheduler::instance().is_scheduled(self)
    }
}

impl PartialEq for TaskHandle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for TaskHandle {}

impl std::hash::Hash for TaskHandle {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl std::fmt::Debug for TaskHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskHandle")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .finish()
    }
}
