// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Condition-driven scheduling
//!
//! A [`Trigger`] polls a boolean condition once per tick, before the run
//! phase, and schedules or cancels tasks on its edges. Edge detection starts
//! from the condition's value at the moment a binding is made.

use crate::clock::SharedClock;
use crate::scheduler::Scheduler;
use crate::task::TaskHandle;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Which edges a debounced trigger delays
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Debounce {
    /// False -> true must hold for the whole interval
    Rising,
    /// True -> false must hold for the whole interval
    Falling,
    Both,
}

/// A condition bound to a scheduler
#[derive(Clone)]
pub struct Trigger {
    scheduler: Scheduler,
    condition: Rc<dyn Fn() -> bool>,
}

impl Trigger {
    pub fn new(scheduler: &Scheduler, condition: impl Fn() -> bool + 'static) -> Self {
        Self {
            scheduler: scheduler.clone(),
            condition: Rc::new(condition),
        }
    }

    /// Trigger on the thread's default scheduler
    pub fn on_default(condition: impl Fn() -> bool + 'static) -> Self {
        Self::new(&Scheduler::instance(), condition)
    }

    /// Current value of the condition
    pub fn get(&self) -> bool {
        (self.condition)()
    }

    /// Schedule `task` when the condition becomes true
    pub fn on_true(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if !previous && current {
                start(scheduler, &task);
            }
        })
    }

    /// Schedule `task` when the condition becomes false
    pub fn on_false(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if previous && !current {
                start(scheduler, &task);
            }
        })
    }

    /// Schedule `task` on either edge
    pub fn on_change(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if previous != current {
                start(scheduler, &task);
            }
        })
    }

    /// Schedule `task` when the condition becomes true, cancel it when false
    pub fn while_true(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if !previous && current {
                start(scheduler, &task);
            } else if previous && !current {
                scheduler.cancel(&task);
            }
        })
    }

    /// Schedule `task` when the condition becomes false, cancel it when true
    pub fn while_false(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if previous && !current {
                start(scheduler, &task);
            } else if !previous && current {
                scheduler.cancel(&task);
            }
        })
    }

    /// Start or stop `task` each time the condition becomes true
    pub fn toggle_on_true(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if !previous && current {
                toggle(scheduler, &task);
            }
        })
    }

    /// Start or stop `task` each time the condition becomes false
    pub fn toggle_on_false(&self, task: TaskHandle) -> &Self {
        self.bind(move |scheduler, previous, current| {
            if previous && !current {
                toggle(scheduler, &task);
            }
        })
    }

    pub fn and(&self, other: &Trigger) -> Trigger {
        let (a, b) = (self.condition.clone(), other.condition.clone());
        self.derive(move || a() && b())
    }

    pub fn or(&self, other: &Trigger) -> Trigger {
        let (a, b) = (self.condition.clone(), other.condition.clone());
        self.derive(move || a() || b())
    }

    pub fn negate(&self) -> Trigger {
        let a = self.condition.clone();
        self.derive(move || !a())
    }

    /// Ignore changes that do not persist for `interval` on the scheduler clock
    pub fn debounce(&self, interval: Duration, kind: Debounce) -> Trigger {
        let input = self.condition.clone();
        let debouncer = RefCell::new(Debouncer::new(interval, kind, self.scheduler.clock()));
        self.derive(move || debouncer.borrow_mut().calculate(input()))
    }

    fn derive(&self, condition: impl Fn() -> bool + 'static) -> Trigger {
        Trigger::new(&self.scheduler, condition)
    }

    fn bind(&self, mut body: impl FnMut(&Scheduler, bool, bool) + 'static) -> &Self {
        let condition = self.condition.clone();
        let mut previous = condition();
        self.scheduler.add_binding(Box::new(move |scheduler| {
            let current = condition();
            body(scheduler, previous, current);
            previous = current;
        }));
        self
    }
}

fn start(scheduler: &Scheduler, task: &TaskHandle) {
    if let Err(e) = scheduler.schedule(task) {
        tracing::warn!(task = task.name(), error = %e, "trigger failed to schedule task");
    }
}

fn toggle(scheduler: &Scheduler, task: &TaskHandle) {
    if scheduler.is_scheduled(task) {
        scheduler.cancel(task);
    } else {
        start(scheduler, task);
    }
}

struct Debouncer {
    interval: Duration,
    kind: Debounce,
    clock: SharedClock,
    baseline: bool,
    since: Instant,
}

impl Debouncer {
    fn new(interval: Duration, kind: Debounce, clock: SharedClock) -> Self {
        let since = clock.now();
        Self {
            interval,
            kind,
            clock,
            baseline: kind == Debounce::Falling,
            since,
        }
    }

    fn calculate(&mut self, input: bool) -> bool {
        if input == self.baseline {
            self.since = self.clock.now();
        }
        if self.clock.since(self.since) >= self.interval {
            if self.kind == Debounce::Both {
                self.baseline = input;
                self.since = self.clock.now();
            }
            return input;
        }
        self.baseline
    }
}

#[cfg(test)]
#[path = "trigger_tests.rs"]
mod tests;
