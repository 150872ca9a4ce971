// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recording task for tests
//!
//! [`ProbeTask`] logs every lifecycle call into a shared [`Probe`] and finishes
//! according to a script, a tick count, or a flag the test flips.

use crate::error::Phase;
use crate::resource::{Requirements, Resource};
use crate::task::{InterruptionBehavior, Task};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

/// A lifecycle call observed by a probe
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProbeEvent {
    Initialize,
    Execute,
    End { interrupted: bool },
}

#[derive(Default)]
struct ProbeLog {
    events: Vec<ProbeEvent>,
    finished: bool,
}

/// Shared view of what a [`ProbeTask`] has been asked to do
#[derive(Clone, Default)]
pub struct Probe {
    log: Rc<RefCell<ProbeLog>>,
}

impl Probe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProbeEvent> {
        self.log.borrow().events.clone()
    }

    pub fn initialize_count(&self) -> usize {
        self.count(|e| matches!(e, ProbeEvent::Initialize))
    }

    pub fn execute_count(&self) -> usize {
        self.count(|e| matches!(e, ProbeEvent::Execute))
    }

    /// The `interrupted` flag of every `end` call, in order
    pub fn end_calls(&self) -> Vec<bool> {
        self.log
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                ProbeEvent::End { interrupted } => Some(*interrupted),
                _ => None,
            })
            .collect()
    }

    /// Make tasks without a script or tick count report finished
    pub fn set_finished(&self, finished: bool) {
        self.log.borrow_mut().finished = finished;
    }

    pub fn clear(&self) {
        self.log.borrow_mut().events.clear();
    }

    fn count(&self, pred: impl Fn(&ProbeEvent) -> bool) -> usize {
        self.log.borrow().events.iter().filter(|e| pred(e)).count()
    }

    fn record(&self, event: ProbeEvent) {
        self.log.borrow_mut().events.push(event);
    }

    fn flag(&self) -> bool {
        self.log.borrow().finished
    }
}

/// Task that records its lifecycle into a [`Probe`]
pub struct ProbeTask {
    probe: Probe,
    name: String,
    requirements: Requirements,
    interruption: InterruptionBehavior,
    runs_when_disabled: bool,
    script: VecDeque<bool>,
    finish_after: Option<usize>,
    executes_since_init: usize,
    panic_in: Option<Phase>,
}

impl ProbeTask {
    pub fn new(probe: &Probe) -> Self {
        Self {
            probe: probe.clone(),
            name: "ProbeTask".to_string(),
            requirements: Requirements::new(),
            interruption: InterruptionBehavior::CancelSelf,
            runs_when_disabled: false,
            script: VecDeque::new(),
            finish_after: None,
            executes_since_init: 0,
            panic_in: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn requiring<'a>(mut self, resources: impl IntoIterator<Item = &'a Resource>) -> Self {
        self.requirements.extend(resources.into_iter().cloned());
        self
    }

    pub fn with_interruption(mut self, behavior: InterruptionBehavior) -> Self {
        self.interruption = behavior;
        self
    }

    pub fn running_when_disabled(mut self) -> Self {
        self.runs_when_disabled = true;
        self
    }

    /// Report finished once `ticks` executes have happened since initialize
    pub fn finishing_after(mut self, ticks: usize) -> Self {
        self.finish_after = Some(ticks);
        self
    }

    /// Answer successive `is_finished` calls from the script, then fall back
    pub fn with_finish_script(mut self, script: impl IntoIterator<Item = bool>) -> Self {
        self.script = script.into_iter().collect();
        self
    }

    /// Panic when the given lifecycle call is made
    pub fn panicking_in(mut self, phase: Phase) -> Self {
        self.panic_in = Some(phase);
        self
    }

    #[allow(clippy::panic)]
    fn maybe_panic(&self, phase: Phase) {
        if self.panic_in == Some(phase) {
            panic!("{} failed in {}", self.name, phase);
        }
    }
}

impl Task for ProbeTask {
    fn initialize(&mut self) {
        self.probe.record(ProbeEvent::Initialize);
        self.executes_since_init = 0;
        self.maybe_panic(Phase::Initialize);
    }

    fn execute(&mut self) {
        self.probe.record(ProbeEvent::Execute);
        self.executes_since_init += 1;
        self.maybe_panic(Phase::Execute);
    }

    fn is_finished(&mut self) -> bool {
        self.maybe_panic(Phase::IsFinished);
        if let Some(next) = self.script.pop_front() {
            return next;
        }
        match self.finish_after {
            Some(ticks) => self.executes_since_init >= ticks,
            None => self.probe.flag(),
        }
    }

    fn end(&mut self, interrupted: bool) {
        self.probe.record(ProbeEvent::End { interrupted });
        self.maybe_panic(Phase::End);
    }

    fn requirements(&self) -> Requirements {
        self.requirements.clone()
    }

    fn interruption_behavior(&self) -> InterruptionBehavior {
        self.interruption
    }

    fn runs_when_disabled(&self) -> bool {
        self.runs_when_disabled
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
