// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tick-driven task scheduler
//!
//! The scheduler owns the set of running tasks and the resource -> holder map.
//! Each call to [`Scheduler::run`] is one control cycle:
//!
//! 1. resource periodic hooks, trigger polling, queued requests
//! 2. for every running task: `execute`, then `is_finished`; finished tasks
//!    get `end(false)` and release their resources
//! 3. requests queued during step 2, then default tasks for idle resources
//!
//! Admission is all-or-nothing: an incoming task either evicts every
//! conflicting holder (all `CancelSelf`) or is rejected outright (any
//! `CancelIncoming`). Scheduling from inside a lifecycle call during the run
//! phase is queued until the phase ends. No borrow of scheduler state is held
//! while task code runs, so tasks may freely call back into the scheduler.

use crate::clock::{SharedClock, SystemClock};
use crate::config::SchedulerConfig;
use crate::error::{Phase, SchedulerError};
use crate::resource::{Requirements, Resource};
use crate::task::{InterruptionBehavior, Task, TaskHandle};
use crate::telemetry::SchedulerSnapshot;
use std::any::Any;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::{Rc, Weak};
use std::time::Duration;

/// Robot mode as seen by the scheduler
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Enabled,
    /// Only tasks that run when disabled are admitted or kept running
    Disabled,
}

/// Lifecycle transitions reported to listeners
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleEvent {
    Initialized,
    Executed,
    Interrupted,
    Finished,
}

type Listener = Box<dyn FnMut(LifecycleEvent, &TaskHandle)>;
type Periodic = Box<dyn FnMut()>;
pub(crate) type Binding = Box<dyn FnMut(&Scheduler)>;

/// Bookkeeping for one scheduled task
struct Entry {
    handle: TaskHandle,
    /// Requirements claimed at admission; released from this exact set
    requirements: Requirements,
    initialized: bool,
}

#[derive(Default)]
struct ResourceSlot {
    default_task: Option<TaskHandle>,
    periodic: Option<Periodic>,
}

struct State {
    config: SchedulerConfig,
    clock: SharedClock,
    mode: Mode,
    enabled: bool,
    /// Running tasks in admission order
    scheduled: Vec<Entry>,
    holders: HashMap<Resource, TaskHandle>,
    resources: BTreeMap<Resource, ResourceSlot>,
    in_run_loop: bool,
    to_schedule: Vec<TaskHandle>,
    to_cancel: Vec<TaskHandle>,
    listeners: Vec<Listener>,
    bindings: Vec<Binding>,
    faults: Vec<SchedulerError>,
    last_tick: Option<Duration>,
}

impl State {
    fn position(&self, handle: &TaskHandle) -> Option<usize> {
        self.scheduled.iter().position(|e| e.handle == *handle)
    }

    fn is_scheduled(&self, handle: &TaskHandle) -> bool {
        self.position(handle).is_some()
    }

    /// Distinct tasks currently holding any of `requirements`
    fn holders_of(&self, requirements: &Requirements) -> Vec<TaskHandle> {
        let mut holders: Vec<TaskHandle> = Vec::new();
        for resource in requirements {
            if let Some(holder) = self.holders.get(resource) {
                if !holders.contains(holder) {
                    holders.push(holder.clone());
                }
            }
        }
        holders
    }

    fn defer_schedule(&mut self, handle: &TaskHandle) {
        if !self.to_schedule.contains(handle) {
            self.to_schedule.push(handle.clone());
        }
    }

    fn release(&mut self, handle: &TaskHandle, requirements: &Requirements) {
        for resource in requirements {
            if self.holders.get(resource) == Some(handle) {
                self.holders.remove(resource);
            }
        }
    }
}

impl Drop for State {
    fn drop(&mut self) {
        // Backstop: nothing scheduled may outlive the scheduler without end(true)
        for entry in std::mem::take(&mut self.scheduled) {
            let handle = entry.handle;
            let ended = catch_unwind(AssertUnwindSafe(|| {
                handle.try_lifecycle(|task| task.end(true))
            }));
            if ended.is_err() {
                tracing::error!(task = handle.name(), "task panicked in end during scheduler teardown");
            }
            handle.end_run();
        }
        self.holders.clear();
    }
}

thread_local! {
    static INSTANCE: RefCell<Option<Scheduler>> = const { RefCell::new(None) };
}

/// Handle to a scheduler; clones share the same state
#[derive(Clone)]
pub struct Scheduler {
    state: Rc<RefCell<State>>,
}

/// Non-owning scheduler reference held by tasks that schedule other tasks
#[derive(Clone, Default)]
pub struct WeakScheduler(Weak<RefCell<State>>);

impl WeakScheduler {
    pub fn upgrade(&self) -> Option<Scheduler> {
        self.0.upgrade().map(|state| Scheduler { state })
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(SchedulerConfig::default())
    }
}

impl Scheduler {
    pub fn new(config: SchedulerConfig) -> Self {
        Self::with_clock(config, SystemClock::shared())
    }

    pub fn with_clock(config: SchedulerConfig, clock: SharedClock) -> Self {
        let mode = if config.start_disabled {
            Mode::Disabled
        } else {
            Mode::Enabled
        };
        Self {
            state: Rc::new(RefCell::new(State {
                config,
                clock,
                mode,
                enabled: true,
                scheduled: Vec::new(),
                holders: HashMap::new(),
                resources: BTreeMap::new(),
                in_run_loop: false,
                to_schedule: Vec::new(),
                to_cancel: Vec::new(),
                listeners: Vec::new(),
                bindings: Vec::new(),
                faults: Vec::new(),
                last_tick: None,
            })),
        }
    }

    /// The thread's default scheduler, created on first use
    pub fn instance() -> Scheduler {
        INSTANCE.with(|cell| {
            cell.borrow_mut()
                .get_or_insert_with(Scheduler::default)
                .clone()
        })
    }

    /// Cancel everything on the default scheduler and replace it with a fresh one
    pub fn reset_instance() {
        let previous = INSTANCE.with(|cell| cell.borrow_mut().take());
        if let Some(scheduler) = previous {
            scheduler.cancel_all();
        }
    }

    pub fn downgrade(&self) -> WeakScheduler {
        WeakScheduler(Rc::downgrade(&self.state))
    }

    pub fn ptr_eq(&self, other: &Scheduler) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }

    pub fn config(&self) -> SchedulerConfig {
        self.state.borrow().config.clone()
    }

    pub fn clock(&self) -> SharedClock {
        self.state.borrow().clock.clone()
    }

    /// Request that a task run
    ///
    /// Rejection because a holder is `CancelIncoming` is not an error; check
    /// [`Scheduler::is_scheduled`] afterwards if the outcome matters.
    pub fn schedule(&self, handle: &TaskHandle) -> Result<(), SchedulerError> {
        if handle.is_composed() {
            return Err(SchedulerError::Composed {
                name: handle.name().to_string(),
            });
        }

        let mut state = self.state.borrow_mut();
        if !state.enabled {
            tracing::debug!(task = handle.name(), "scheduler disabled, ignoring request");
            return Ok(());
        }
        if state.in_run_loop || handle.is_busy() {
            tracing::debug!(task = handle.name(), "deferring schedule request");
            state.defer_schedule(handle);
            return Ok(());
        }
        if state.mode == Mode::Disabled && !handle.runs_when_disabled() {
            tracing::debug!(task = handle.name(), "robot disabled, task does not run when disabled");
            return Ok(());
        }
        if state.is_scheduled(handle) {
            return Ok(());
        }
        if handle.is_running() {
            return Err(SchedulerError::AlreadyRunning {
                name: handle.name().to_string(),
            });
        }

        let requirements = handle.requirements();
        let holders = state.holders_of(&requirements);
        if let Some(blocker) = holders
            .iter()
            .find(|h| h.interruption_behavior() == InterruptionBehavior::CancelIncoming)
        {
            tracing::debug!(
                task = handle.name(),
                holder = blocker.name(),
                "rejected: holder cancels incoming"
            );
            return Ok(());
        }
        if holders.iter().any(|h| h.is_busy() || !state.is_scheduled(h)) {
            tracing::debug!(task = handle.name(), "holder is mid-lifecycle, deferring");
            state.defer_schedule(handle);
            return Ok(());
        }
        drop(state);

        for holder in &holders {
            tracing::debug!(task = handle.name(), evicted = holder.name(), "evicting holder");
            self.cancel(holder);
        }

        let mut state = self.state.borrow_mut();
        if !state.holders_of(&requirements).is_empty() {
            // An evicted task's end() claimed one of our resources
            state.defer_schedule(handle);
            return Ok(());
        }
        state.scheduled.push(Entry {
            handle: handle.clone(),
            requirements: requirements.clone(),
            initialized: false,
        });
        handle.begin_run();
        for resource in &requirements {
            state.holders.insert(resource.clone(), handle.clone());
        }
        drop(state);

        tracing::debug!(task = handle.name(), id = %handle.id(), "admitted");
        match guarded(handle, Phase::Initialize, |task| task.initialize()) {
            Ok(_) => {
                let mut state = self.state.borrow_mut();
                if let Some(index) = state.position(handle) {
                    state.scheduled[index].initialized = true;
                }
                drop(state);
                self.notify(LifecycleEvent::Initialized, handle);
                Ok(())
            }
            Err(fault) => {
                self.teardown_after_fault(handle, Phase::Initialize);
                tracing::error!(error = %fault, "task failed to initialize");
                Err(fault)
            }
        }
    }

    /// Schedule several tasks in order, stopping at the first error
    pub fn schedule_all<'a>(
        &self,
        handles: impl IntoIterator<Item = &'a TaskHandle>,
    ) -> Result<(), SchedulerError> {
        for handle in handles {
            self.schedule(handle)?;
        }
        Ok(())
    }

    /// Cancel a task, calling `end(true)` before this returns
    ///
    /// A no-op for tasks that are not scheduled. If the task's own lifecycle
    /// call is on the stack (a task cancelling itself) the cancellation is
    /// queued until the end of the current run phase.
    pub fn cancel(&self, handle: &TaskHandle) {
        let mut state = self.state.borrow_mut();
        state.to_schedule.retain(|h| h != handle);
        let Some(index) = state.position(handle) else {
            return;
        };
        if handle.is_busy() {
            if !state.to_cancel.contains(handle) {
                state.to_cancel.push(handle.clone());
            }
            return;
        }
        let entry = state.scheduled.remove(index);
        drop(state);

        let ended = guarded(handle, Phase::End, |task| task.end(true));
        handle.end_run();
        self.state
            .borrow_mut()
            .release(handle, &entry.requirements);
        tracing::debug!(task = handle.name(), "interrupted");
        self.notify(LifecycleEvent::Interrupted, handle);
        if let Err(fault) = ended {
            self.record_fault(fault);
        }
    }

    pub fn cancel_all(&self) {
        for handle in self.scheduled_tasks() {
            self.cancel(&handle);
        }
    }

    pub fn is_scheduled(&self, handle: &TaskHandle) -> bool {
        self.state.borrow().is_scheduled(handle)
    }

    /// Whether a schedule request for this task is queued
    pub fn is_pending(&self, handle: &TaskHandle) -> bool {
        self.state.borrow().to_schedule.contains(handle)
    }

    /// Running tasks in admission order
    pub fn scheduled_tasks(&self) -> Vec<TaskHandle> {
        self.state
            .borrow()
            .scheduled
            .iter()
            .map(|e| e.handle.clone())
            .collect()
    }

    /// Names and ids of the running tasks
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot::from_tasks(&self.scheduled_tasks())
    }

    /// The task currently holding a resource
    pub fn requiring(&self, resource: &Resource) -> Option<TaskHandle> {
        self.state.borrow().holders.get(resource).cloned()
    }

    /// One control cycle
    ///
    /// Task panics are contained: the faulting task is removed, given
    /// `end(true)` where possible, and its resources released. The tick
    /// carries on and the first fault is returned.
    pub fn run(&self) -> Result<(), SchedulerError> {
        let started = {
            let state = self.state.borrow();
            if !state.enabled {
                return Ok(());
            }
            state.clock.now()
        };

        self.run_periodic();
        self.poll_bindings();
        self.drain_pending();

        let (snapshot, disabled) = {
            let mut state = self.state.borrow_mut();
            state.in_run_loop = true;
            let snapshot: Vec<TaskHandle> =
                state.scheduled.iter().map(|e| e.handle.clone()).collect();
            (snapshot, state.mode == Mode::Disabled)
        };

        for handle in snapshot {
            if !self.is_scheduled(&handle) {
                continue;
            }
            if handle.is_composed() {
                tracing::debug!(task = handle.name(), "composed while scheduled, cancelling");
                self.cancel(&handle);
                continue;
            }
            if disabled && !handle.runs_when_disabled() {
                self.cancel(&handle);
                continue;
            }
            if let Err(fault) = guarded(&handle, Phase::Execute, |task| task.execute()) {
                self.teardown_after_fault(&handle, Phase::Execute);
                self.record_fault(fault);
                continue;
            }
            self.notify(LifecycleEvent::Executed, &handle);
            if !self.is_scheduled(&handle) {
                continue;
            }
            match guarded(&handle, Phase::IsFinished, |task| task.is_finished()) {
                Ok(Some(true)) => self.finish(&handle),
                Ok(_) => {}
                Err(fault) => {
                    self.teardown_after_fault(&handle, Phase::IsFinished);
                    self.record_fault(fault);
                }
            }
        }

        self.state.borrow_mut().in_run_loop = false;
        self.drain_pending();
        self.schedule_defaults();

        let mut state = self.state.borrow_mut();
        let elapsed = state.clock.since(started);
        state.last_tick = Some(elapsed);
        if state.config.warn_on_overrun && elapsed > state.config.period {
            tracing::warn!(?elapsed, period = ?state.config.period, "scheduler loop overrun");
        }
        if state.faults.is_empty() {
            return Ok(());
        }
        let mut faults = std::mem::take(&mut state.faults);
        Err(faults.remove(0))
    }

    /// Duration of the most recent tick
    pub fn last_tick_duration(&self) -> Option<Duration> {
        self.state.borrow().last_tick
    }

    pub fn register_resource(&self, resource: &Resource) {
        self.state
            .borrow_mut()
            .resources
            .entry(resource.clone())
            .or_default();
    }

    /// Call `hook` at the start of every tick
    pub fn register_periodic(&self, resource: &Resource, hook: impl FnMut() + 'static) {
        self.state
            .borrow_mut()
            .resources
            .entry(resource.clone())
            .or_default()
            .periodic = Some(Box::new(hook));
    }

    /// Forget a resource, its default task and periodic hook
    pub fn unregister_resource(&self, resource: &Resource) {
        self.state.borrow_mut().resources.remove(resource);
    }

    /// Install the task that runs whenever `resource` is otherwise idle
    pub fn set_default_task(
        &self,
        resource: &Resource,
        handle: &TaskHandle,
    ) -> Result<(), SchedulerError> {
        if handle.is_composed() {
            return Err(SchedulerError::Composed {
                name: handle.name().to_string(),
            });
        }
        if !handle.has_requirement(resource) {
            return Err(SchedulerError::DefaultMissingRequirement {
                task: handle.name().to_string(),
                resource: resource.name().to_string(),
            });
        }
        if handle.interruption_behavior() == InterruptionBehavior::CancelIncoming {
            tracing::warn!(
                task = handle.name(),
                resource = resource.name(),
                "default task cancels incoming; other tasks will not be able to claim this resource"
            );
        }
        self.state
            .borrow_mut()
            .resources
            .entry(resource.clone())
            .or_default()
            .default_task = Some(handle.clone());
        Ok(())
    }

    pub fn remove_default_task(&self, resource: &Resource) {
        if let Some(slot) = self.state.borrow_mut().resources.get_mut(resource) {
            slot.default_task = None;
        }
    }

    pub fn default_task(&self, resource: &Resource) -> Option<TaskHandle> {
        self.state
            .borrow()
            .resources
            .get(resource)
            .and_then(|slot| slot.default_task.clone())
    }

    /// Stop ticking and ignore schedule requests
    pub fn disable(&self) {
        self.state.borrow_mut().enabled = false;
    }

    pub fn enable(&self) {
        self.state.borrow_mut().enabled = true;
    }

    pub fn set_mode(&self, mode: Mode) {
        self.state.borrow_mut().mode = mode;
    }

    pub fn mode(&self) -> Mode {
        self.state.borrow().mode
    }

    /// Observe lifecycle transitions of every task this scheduler runs
    pub fn on_lifecycle(&self, listener: impl FnMut(LifecycleEvent, &TaskHandle) + 'static) {
        self.state.borrow_mut().listeners.push(Box::new(listener));
    }

    pub(crate) fn add_binding(&self, binding: Binding) {
        self.state.borrow_mut().bindings.push(binding);
    }

    fn finish(&self, handle: &TaskHandle) {
        let entry = {
            let mut state = self.state.borrow_mut();
            let Some(index) = state.position(handle) else {
                return;
            };
            state.scheduled.remove(index)
        };
        let ended = guarded(handle, Phase::End, |task| task.end(false));
        handle.end_run();
        self.state
            .borrow_mut()
            .release(handle, &entry.requirements);
        tracing::debug!(task = handle.name(), "finished");
        self.notify(LifecycleEvent::Finished, handle);
        if let Err(fault) = ended {
            self.record_fault(fault);
        }
    }

    /// Restore bookkeeping after task code panicked in `failed`
    fn teardown_after_fault(&self, handle: &TaskHandle, failed: Phase) {
        let entry = {
            let mut state = self.state.borrow_mut();
            match state.position(handle) {
                Some(index) => state.scheduled.remove(index),
                None => return,
            }
        };
        if failed != Phase::End {
            if let Err(fault) = guarded(handle, Phase::End, |task| task.end(true)) {
                tracing::error!(error = %fault, "task panicked again while ending");
            }
        }
        handle.end_run();
        self.state
            .borrow_mut()
            .release(handle, &entry.requirements);
        self.notify(LifecycleEvent::Interrupted, handle);
    }

    fn record_fault(&self, fault: SchedulerError) {
        tracing::error!(error = %fault, "task fault");
        self.state.borrow_mut().faults.push(fault);
    }

    fn notify(&self, event: LifecycleEvent, handle: &TaskHandle) {
        let mut listeners = std::mem::take(&mut self.state.borrow_mut().listeners);
        if listeners.is_empty() {
            return;
        }
        let mut faults = Vec::new();
        for listener in listeners.iter_mut() {
            if let Err(fault) = contained("lifecycle listener", || listener(event, handle)) {
                faults.push(fault);
            }
        }
        {
            let mut state = self.state.borrow_mut();
            listeners.append(&mut state.listeners);
            state.listeners = listeners;
        }
        for fault in faults {
            self.record_fault(fault);
        }
    }

    fn run_periodic(&self) {
        let hooks: Vec<(Resource, Periodic)> = self
            .state
            .borrow_mut()
            .resources
            .iter_mut()
            .filter_map(|(resource, slot)| slot.periodic.take().map(|hook| (resource.clone(), hook)))
            .collect();
        let mut returned = Vec::with_capacity(hooks.len());
        let mut faults = Vec::new();
        for (resource, mut hook) in hooks {
            let callback = format!("periodic hook of {resource}");
            if let Err(fault) = contained(&callback, &mut hook) {
                faults.push(fault);
            }
            returned.push((resource, hook));
        }
        {
            let mut state = self.state.borrow_mut();
            for (resource, hook) in returned {
                if let Some(slot) = state.resources.get_mut(&resource) {
                    slot.periodic.get_or_insert(hook);
                }
            }
        }
        for fault in faults {
            self.record_fault(fault);
        }
    }

    fn poll_bindings(&self) {
        let mut bindings = std::mem::take(&mut self.state.borrow_mut().bindings);
        let mut faults = Vec::new();
        for binding in bindings.iter_mut() {
            if let Err(fault) = contained("trigger binding", || binding(self)) {
                faults.push(fault);
            }
        }
        {
            let mut state = self.state.borrow_mut();
            bindings.append(&mut state.bindings);
            state.bindings = bindings;
        }
        for fault in faults {
            self.record_fault(fault);
        }
    }

    fn drain_pending(&self) {
        let (to_schedule, to_cancel) = {
            let mut state = self.state.borrow_mut();
            (
                std::mem::take(&mut state.to_schedule),
                std::mem::take(&mut state.to_cancel),
            )
        };
        for handle in &to_schedule {
            if let Err(fault) = self.schedule(handle) {
                self.record_fault(fault);
            }
        }
        for handle in &to_cancel {
            self.cancel(handle);
        }
    }

    fn schedule_defaults(&self) {
        let idle_defaults: Vec<TaskHandle> = {
            let state = self.state.borrow();
            state
                .resources
                .iter()
                .filter(|(resource, _)| !state.holders.contains_key(*resource))
                .filter_map(|(_, slot)| slot.default_task.clone())
                .collect()
        };
        for handle in &idle_defaults {
            if let Err(fault) = self.schedule(handle) {
                self.record_fault(fault);
            }
        }
    }
}

/// Run one lifecycle call with panics contained
///
/// `Ok(None)` means the task was already mid-call and nothing ran.
fn guarded<R>(
    handle: &TaskHandle,
    phase: Phase,
    f: impl FnOnce(&mut dyn Task) -> R,
) -> Result<Option<R>, SchedulerError> {
    catch_unwind(AssertUnwindSafe(|| handle.try_lifecycle(f))).map_err(|payload| {
        SchedulerError::TaskPanicked {
            task: handle.name().to_string(),
            phase,
            message: panic_message(payload.as_ref()),
        }
    })
}

/// Run scheduler-owned callback code (hooks, bindings, listeners) with panics contained
fn contained(callback: &str, f: impl FnOnce()) -> Result<(), SchedulerError> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| SchedulerError::CallbackPanicked {
        callback: callback.to_string(),
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
