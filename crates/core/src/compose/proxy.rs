// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tasks that hand work to the scheduler or build it late

use super::Composition;
use crate::resource::Requirements;
use crate::scheduler::{Scheduler, WeakScheduler};
use crate::task::{Task, TaskHandle};

/// Where a [`Proxy`] gets the task it schedules
pub enum ProxySource {
    /// Called on every `initialize`
    Factory(Box<dyn FnMut() -> TaskHandle>),
    Handle(TaskHandle),
}

/// Schedules another task on its own and waits for it to stop
///
/// The proxy claims no resources; the proxied task claims its own when it is
/// scheduled. Interrupting the proxy cancels the proxied task.
pub struct Proxy {
    scheduler: Option<WeakScheduler>,
    source: ProxySource,
    current: Option<TaskHandle>,
}

impl Proxy {
    /// Proxy onto the thread's default scheduler
    pub fn new(source: ProxySource) -> Self {
        Self {
            scheduler: None,
            source,
            current: None,
        }
    }

    pub fn on(scheduler: &Scheduler, source: ProxySource) -> Self {
        Self {
            scheduler: Some(scheduler.downgrade()),
            source,
            current: None,
        }
    }

    fn scheduler(&self) -> Option<Scheduler> {
        match &self.scheduler {
            Some(weak) => weak.upgrade(),
            None => Some(Scheduler::instance()),
        }
    }
}

impl Task for Proxy {
    fn initialize(&mut self) {
        let handle = match &mut self.source {
            ProxySource::Factory(factory) => factory(),
            ProxySource::Handle(handle) => handle.clone(),
        };
        if let Some(scheduler) = self.scheduler() {
            if let Err(e) = scheduler.schedule(&handle) {
                tracing::warn!(task = handle.name(), error = %e, "proxy failed to schedule task");
            }
        }
        self.current = Some(handle);
    }

    fn is_finished(&mut self) -> bool {
        let (Some(handle), Some(scheduler)) = (&self.current, self.scheduler()) else {
            return true;
        };
        !scheduler.is_scheduled(handle) && !scheduler.is_pending(handle)
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(handle) = self.current.take() {
            if interrupted {
                if let Some(scheduler) = self.scheduler() {
                    scheduler.cancel(&handle);
                }
            }
        }
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }

    fn name(&self) -> String {
        match &self.source {
            ProxySource::Handle(handle) => format!("Proxy({})", handle.name()),
            ProxySource::Factory(_) => "Proxy".to_string(),
        }
    }
}

/// Builds its task from a factory on every `initialize` and runs it inline
///
/// Requirements are declared up front because the task does not exist until
/// it starts.
pub struct Deferred {
    factory: Box<dyn FnMut() -> Composition>,
    requirements: Requirements,
    current: Option<Composition>,
}

impl Deferred {
    pub fn new(factory: impl FnMut() -> Composition + 'static, requirements: Requirements) -> Self {
        Self {
            factory: Box::new(factory),
            requirements,
            current: None,
        }
    }
}

impl Task for Deferred {
    fn initialize(&mut self) {
        let mut task = (self.factory)();
        task.initialize();
        self.current = Some(task);
    }

    fn execute(&mut self) {
        if let Some(task) = self.current.as_mut() {
            task.execute();
        }
    }

    fn is_finished(&mut self) -> bool {
        self.current.as_mut().is_none_or(|task| task.is_finished())
    }

    fn end(&mut self, interrupted: bool) {
        if let Some(mut task) = self.current.take() {
            task.end(interrupted);
        }
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }
}

/// Schedules tasks independently and finishes immediately
pub struct Fork {
    scheduler: Option<WeakScheduler>,
    tasks: Vec<TaskHandle>,
}

impl Fork {
    pub fn new(tasks: Vec<TaskHandle>) -> Self {
        Self {
            scheduler: None,
            tasks,
        }
    }

    pub fn on(scheduler: &Scheduler, tasks: Vec<TaskHandle>) -> Self {
        Self {
            scheduler: Some(scheduler.downgrade()),
            tasks,
        }
    }
}

impl Task for Fork {
    fn initialize(&mut self) {
        let scheduler = match &self.scheduler {
            Some(weak) => weak.upgrade(),
            None => Some(Scheduler::instance()),
        };
        let Some(scheduler) = scheduler else {
            return;
        };
        for handle in &self.tasks {
            if let Err(e) = scheduler.schedule(handle) {
                tracing::warn!(task = handle.name(), error = %e, "fork failed to schedule task");
            }
        }
    }

    fn is_finished(&mut self) -> bool {
        true
    }

    fn runs_when_disabled(&self) -> bool {
        true
    }
}

#[cfg(test)]
#[path = "proxy_tests.rs"]
mod tests;
