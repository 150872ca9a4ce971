// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::resource::Resource;
use crate::task::{run_to_completion, StepIter};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[test]
fn functional_task_calls_each_closure() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let executes = Rc::new(Cell::new(0));
    let (init_log, end_log, count, done) = (log.clone(), log.clone(), executes.clone(), executes.clone());
    let mut task = FunctionalTask::new()
        .on_initialize(move || init_log.borrow_mut().push("init".to_string()))
        .on_execute(move || count.set(count.get() + 1))
        .on_end(move |interrupted| end_log.borrow_mut().push(format!("end({interrupted})")))
        .finished_when(move || done.get() >= 3);

    assert_eq!(run_to_completion(&mut task, 10), 3);
    assert_eq!(*log.borrow(), vec!["init".to_string(), "end(false)".to_string()]);
}

#[test]
fn functional_task_without_predicate_runs_forever() {
    let mut task = FunctionalTask::new();
    assert_eq!(run_to_completion(&mut task, 25), 25);
}

#[test]
fn functional_task_carries_policy() {
    let arm = Resource::new("arm");
    let task = FunctionalTask::new()
        .named("hold")
        .requiring([&arm].into_iter().collect())
        .running_when_disabled(true);
    assert_eq!(task.name(), "hold");
    assert!(task.requirements().contains(&arm));
    assert!(task.runs_when_disabled());
}

#[test]
fn noop_and_once_finish_on_first_tick() {
    let hits = Rc::new(Cell::new(0));
    let counter = hits.clone();
    assert_eq!(run_to_completion(&mut FunctionalTask::noop(), 5), 1);
    assert_eq!(
        run_to_completion(
            &mut FunctionalTask::once(move || counter.set(counter.get() + 1)),
            5
        ),
        1
    );
    assert_eq!(hits.get(), 1);
}

#[test]
fn wait_finishes_after_duration_on_clock() {
    let clock = FakeClock::new();
    let mut task = Wait::new(Duration::from_secs(1), clock.shared());
    assert!(task.runs_when_disabled());

    let mut steps = StepIter::new(&mut task);
    steps.next();
    clock.advance(Duration::from_millis(999));
    steps.next();
    assert!(!steps.is_done());
    clock.advance(Duration::from_millis(1));
    steps.next();
    assert!(steps.is_done());
}

#[test]
fn wait_restarts_its_timer_on_each_initialize() {
    let clock = FakeClock::new();
    let mut task = Wait::new(Duration::from_millis(100), clock.shared());
    clock.advance(Duration::from_secs(5));

    let mut steps = StepIter::new(&mut task);
    steps.next();
    assert!(!steps.is_done());
}

#[test]
fn wait_until_polls_condition() {
    let ready = Rc::new(Cell::new(false));
    let flag = ready.clone();
    let mut task = WaitUntil::new(move || flag.get());

    let mut steps = StepIter::new(&mut task);
    steps.next();
    steps.next();
    assert!(!steps.is_done());
    ready.set(true);
    assert_eq!(steps.next(), Some(3));
    assert!(steps.is_done());
}
