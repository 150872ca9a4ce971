// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Task composition
//!
//! A [`Composition`] owns exactly one task and is consumed by every combinator
//! that wraps it, so a task can only ever belong to one composition. Existing
//! shared handles can be folded in with [`Composition::from_handle`]; the handle
//! is then marked composed and the scheduler refuses to run it on its own.

mod decorate;
mod group;
mod proxy;

pub use decorate::{Conditional, EndCondition, Repeat, Select, Wrapped};
pub use group::{Deadline, Parallel, Race, Sequence};
pub use proxy::{Deferred, Fork, Proxy, ProxySource};

use crate::clock::{SharedClock, SystemClock};
use crate::error::CompositionError;
use crate::resource::Requirements;
use crate::scheduler::Scheduler;
use crate::task::{InterruptionBehavior, Task, TaskHandle};
use crate::tasks::FunctionalTask;
use std::time::Duration;

/// Move-only builder owning one task
pub struct Composition {
    task: Box<dyn Task>,
}

impl Composition {
    pub fn new(task: impl Task + 'static) -> Self {
        Self::from_boxed(Box::new(task))
    }

    pub fn from_boxed(task: Box<dyn Task>) -> Self {
        Self { task }
    }

    /// Take over a shared handle; it can no longer be scheduled independently
    ///
    /// A handle that is currently running cannot be composed.
    pub fn from_handle(handle: &TaskHandle) -> Result<Self, CompositionError> {
        if handle.is_running() {
            return Err(CompositionError::Running {
                name: handle.name().to_string(),
            });
        }
        handle.mark_composed()?;
        Ok(Self::new(Shared {
            handle: handle.clone(),
            owns_run: false,
        }))
    }

    /// Finish building and produce a schedulable handle
    pub fn into_handle(self) -> TaskHandle {
        TaskHandle::from_boxed(self.task)
    }

    pub fn into_task(self) -> Box<dyn Task> {
        self.task
    }

    /// Stop when `timeout` has elapsed on the system clock
    pub fn with_timeout(self, timeout: Duration) -> Self {
        self.with_timeout_on(timeout, SystemClock::shared())
    }

    pub fn with_timeout_on(self, timeout: Duration, clock: SharedClock) -> Self {
        Self::new(EndCondition::timeout(self.task, timeout, clock))
    }

    /// Stop as soon as `condition` is true; the inner task is interrupted
    pub fn until(self, condition: impl FnMut() -> bool + 'static) -> Self {
        Self::new(EndCondition::until(self.task, condition))
    }

    /// Run while `condition` holds
    pub fn only_while(self, mut condition: impl FnMut() -> bool + 'static) -> Self {
        self.until(move || !condition())
    }

    /// Skip entirely if `condition` is true at start
    pub fn unless(self, condition: impl FnMut() -> bool + 'static) -> Self {
        Self::new(Conditional::new(
            Box::new(FunctionalTask::noop()),
            self.task,
            condition,
        ))
    }

    /// Skip entirely unless `condition` is true at start
    pub fn only_if(self, mut condition: impl FnMut() -> bool + 'static) -> Self {
        self.unless(move || !condition())
    }

    pub fn ignoring_disable(self, runs_when_disabled: bool) -> Self {
        Self::new(Wrapped::new(self.task).runs_when_disabled(runs_when_disabled))
    }

    pub fn with_interrupt_behavior(self, behavior: InterruptionBehavior) -> Self {
        Self::new(Wrapped::new(self.task).interruption_behavior(behavior))
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self::new(Wrapped::new(self.task).named(name))
    }

    /// Call `on_end(interrupted)` after the task ends, however it ends
    pub fn finally_do(self, on_end: impl FnMut(bool) + 'static) -> Self {
        Self::new(Wrapped::new(self.task).on_end(on_end))
    }

    /// Call `on_interrupt` only when the task is interrupted
    pub fn handle_interrupt(self, mut on_interrupt: impl FnMut() + 'static) -> Self {
        self.finally_do(move |interrupted| {
            if interrupted {
                on_interrupt();
            }
        })
    }

    /// Run `action` once before this task
    pub fn before_starting(self, action: impl FnMut() + 'static, requirements: Requirements) -> Self {
        self.before_starting_task(Self::new(FunctionalTask::once(action).requiring(requirements)))
    }

    /// Run `action` once after this task finishes
    pub fn and_then(self, action: impl FnMut() + 'static, requirements: Requirements) -> Self {
        self.and_then_task(Self::new(FunctionalTask::once(action).requiring(requirements)))
    }

    pub fn before_starting_task(self, first: Composition) -> Self {
        Self::new(Sequence::new(vec![first, self]))
    }

    pub fn and_then_task(self, next: Composition) -> Self {
        Self::new(Sequence::new(vec![self, next]))
    }

    /// Run alongside `others`; finished when all are
    pub fn along_with(self, others: Vec<Composition>) -> Result<Self, CompositionError> {
        Ok(Self::new(Parallel::new(prepend(self, others))?))
    }

    /// Run alongside `others`; finished when any is
    pub fn race_with(self, others: Vec<Composition>) -> Result<Self, CompositionError> {
        Ok(Self::new(Race::new(prepend(self, others))?))
    }

    /// Run alongside `others`, which are interrupted when this task finishes
    pub fn deadline_with(self, others: Vec<Composition>) -> Result<Self, CompositionError> {
        Ok(Self::new(Deadline::new(self, others)?))
    }

    /// Restart every time the task finishes; never finishes on its own
    pub fn repeatedly(self) -> Self {
        Self::new(Repeat::new(self.task))
    }

    /// Schedule the task separately on the thread's default scheduler
    pub fn as_proxy(self) -> Self {
        Self::new(Proxy::new(ProxySource::Handle(self.into_handle())))
    }

    pub fn as_proxy_on(self, scheduler: &Scheduler) -> Self {
        Self::new(Proxy::on(
            scheduler,
            ProxySource::Handle(self.into_handle()),
        ))
    }
}

impl Task for Composition {
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

fn prepend(first: Composition, rest: Vec<Composition>) -> Vec<Composition> {
    let mut all = Vec::with_capacity(rest.len() + 1);
    all.push(first);
    all.extend(rest);
    all
}

/// A composed shared handle, driven through its handle
///
/// Each run claims the handle's lifecycle. If something else already runs the
/// task, this run skips it and reports finished straight away.
struct Shared {
    handle: TaskHandle,
    owns_run: bool,
}

impl Task for Shared {
    fn initialize(&mut self) {
        self.owns_run = self.handle.begin_run();
        if !self.owns_run {
            tracing::warn!(task = self.handle.name(), "composed task is already running, skipping");
            return;
        }
        self.handle.try_lifecycle(|task| task.initialize());
    }

    fn execute(&mut self) {
        if self.owns_run {
            self.handle.try_lifecycle(|task| task.execute());
        }
    }

    fn is_finished(&mut self) -> bool {
        if !self.owns_run {
            return true;
        }
        self.handle
            .try_lifecycle(|task| task.is_finished())
            .unwrap_or(false)
    }

    fn end(&mut self, interrupted: bool) {
        if !std::mem::take(&mut self.owns_run) {
            return;
        }
        self.handle.try_lifecycle(|task| task.end(interrupted));
        self.handle.end_run();
    }

    fn requirements(&self) -> Requirements {
        self.handle.requirements()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.handle.interruption_behavior()
    }

    fn runs_when_disabled(&self) -> bool {
        self.handle.runs_when_disabled()
    }

    fn name(&self) -> String {
        self.handle.name().to_string()
    }
}

/// Union of requirements; `CancelSelf` if any member is; runs when disabled only if all do
pub(crate) struct GroupPolicy {
    pub requirements: Requirements,
    pub interruption: InterruptionBehavior,
    pub runs_when_disabled: bool,
}

impl GroupPolicy {
    pub fn of<'a>(members: impl IntoIterator<Item = &'a dyn Task>) -> Self {
        let mut policy = GroupPolicy {
            requirements: Requirements::new(),
            interruption: InterruptionBehavior::CancelIncoming,
            runs_when_disabled: true,
        };
        let mut any = false;
        for member in members {
            any = true;
            policy.requirements.extend(member.requirements());
            if member.interruption_behavior() == InterruptionBehavior::CancelSelf {
                policy.interruption = InterruptionBehavior::CancelSelf;
            }
            policy.runs_when_disabled &= member.runs_when_disabled();
        }
        if !any {
            policy.interruption = InterruptionBehavior::CancelSelf;
        }
        policy
    }
}

/// Fail if any two members share a resource
pub(crate) fn ensure_disjoint(members: &[&dyn Task]) -> Result<(), CompositionError> {
    for (i, first) in members.iter().enumerate() {
        for second in &members[i + 1..] {
            let shared = first.requirements().intersection(&second.requirements());
            if !shared.is_empty() {
                return Err(CompositionError::OverlappingRequirements {
                    first: first.name(),
                    second: second.name(),
                    resources: shared.names(),
                });
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "compose_tests.rs"]
mod tests;
