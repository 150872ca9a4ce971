// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::clock::FakeClock;
use crate::config::SchedulerConfig;
use crate::probe::{Probe, ProbeTask};
use crate::resource::Resource;
use crate::scheduler::Scheduler;
use crate::task::{run_to_completion, Task};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use yare::parameterized;

fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
    let hits = Rc::new(Cell::new(0));
    let inner = hits.clone();
    (hits, move || inner.set(inner.get() + 1))
}

#[test]
fn none_finishes_immediately_and_claims_nothing() {
    let mut task = none();
    assert!(task.requirements().is_empty());
    assert_eq!(run_to_completion(&mut task, 5), 1);
}

#[test]
fn idle_holds_requirements_until_interrupted() {
    let arm = Resource::new("arm");
    let mut task = idle([&arm].into_iter().collect());
    assert!(task.requirements().contains(&arm));
    assert_eq!(run_to_completion(&mut task, 7), 7);
}

#[test]
fn run_once_and_run_differ_in_lifetime() {
    let (once_hits, once_action) = counter();
    let (run_hits, run_action) = counter();

    assert_eq!(run_to_completion(&mut run_once(once_action, Requirements::new()), 5), 1);
    assert_eq!(run_to_completion(&mut run(run_action, Requirements::new()), 5), 5);

    assert_eq!(once_hits.get(), 1);
    assert_eq!(run_hits.get(), 5);
}

#[parameterized(
    start_end = { "start_end" },
    run_end = { "run_end" },
    start_run = { "start_run" },
)]
fn paired_factories_call_both_halves(kind: &str) {
    let (first_hits, first) = counter();
    let (second_hits, second) = counter();
    let mut task = match kind {
        "start_end" => crate::factory::start_end(first, second, Requirements::new()),
        "run_end" => crate::factory::run_end(first, second, Requirements::new()),
        _ => crate::factory::start_run(first, second, Requirements::new()),
    };

    run_to_completion(&mut task, 3);

    let (expected_first, expected_second) = match kind {
        "start_end" => (1, 1),
        "run_end" => (3, 1),
        _ => (1, 3),
    };
    assert_eq!(first_hits.get(), expected_first);
    assert_eq!(second_hits.get(), expected_second);
}

#[test]
fn print_runs_when_disabled() {
    let mut task = print("hello");
    assert!(task.runs_when_disabled());
    assert_eq!(run_to_completion(&mut task, 5), 1);
}

#[test]
fn wait_on_uses_clock() {
    let clock = FakeClock::new();
    let mut task = wait_on(Duration::from_millis(20), clock.shared());
    let mut ticks = 0;
    let mut steps = crate::task::StepIter::new(&mut task);
    while steps.next().is_some() {
        ticks += 1;
        clock.advance(Duration::from_millis(10));
    }
    assert_eq!(ticks, 3);
}

#[test]
fn wait_until_finishes_when_condition_holds() {
    let mut task = wait_until(|| true);
    assert_eq!(run_to_completion(&mut task, 5), 1);
}

#[test]
fn either_picks_branch_at_start() {
    let (yes, no) = (Probe::new(), Probe::new());
    let mut task = either(
        Composition::new(ProbeTask::new(&yes).finishing_after(1)),
        Composition::new(ProbeTask::new(&no).finishing_after(1)),
        || true,
    );
    run_to_completion(&mut task, 5);
    assert_eq!(yes.end_calls(), vec![false]);
    assert!(no.events().is_empty());
}

#[test]
fn select_uses_selector_key() {
    let (low, high) = (Probe::new(), Probe::new());
    let mut task = select(
        vec![
            (1, Composition::new(ProbeTask::new(&low).finishing_after(1))),
            (2, Composition::new(ProbeTask::new(&high).finishing_after(1))),
        ],
        || 2,
    );
    run_to_completion(&mut task, 5);
    assert!(low.events().is_empty());
    assert_eq!(high.end_calls(), vec![false]);
}

#[test]
fn defer_builds_late() {
    let built = Rc::new(Cell::new(false));
    let flag = built.clone();
    let mut task = defer(
        move || {
            flag.set(true);
            none()
        },
        Requirements::new(),
    );
    assert!(!built.get());
    assert_eq!(run_to_completion(&mut task, 5), 1);
    assert!(built.get());
}

#[test]
fn fork_uses_the_thread_instance() {
    Scheduler::reset_instance();
    let probe = Probe::new();
    let forked = TaskHandle::new(ProbeTask::new(&probe));
    let launcher = fork(vec![forked.clone()]).into_handle();

    launcher.schedule().unwrap();
    assert!(forked.is_scheduled());

    Scheduler::reset_instance();
    assert_eq!(probe.end_calls(), vec![true]);
}

#[test]
fn repeating_sequence_loops() {
    let order = Rc::new(RefCell::new(Vec::new()));
    let (a, b) = (order.clone(), order.clone());
    let mut task = repeating_sequence(vec![
        run_once(move || a.borrow_mut().push('a'), Requirements::new()),
        run_once(move || b.borrow_mut().push('b'), Requirements::new()),
    ]);
    run_to_completion(&mut task, 4);
    assert_eq!(*order.borrow(), vec!['a', 'b', 'a', 'b']);
}

#[test]
fn concurrent_factories_validate_requirements() {
    let arm = Resource::new("arm");
    let probe = Probe::new();
    let make = || Composition::new(ProbeTask::new(&probe).requiring([&arm]));

    assert!(parallel(vec![make(), make()]).is_err());
    assert!(race(vec![make(), make()]).is_err());
    assert!(deadline(make(), vec![make()]).is_err());
    assert!(sequence(vec![make(), make()]).requirements().contains(&arm));

    let drive = Resource::new("drive");
    let other = Composition::new(ProbeTask::new(&probe).requiring([&drive]));
    assert!(parallel(vec![make(), other]).is_ok());
}

#[test]
fn scheduled_factories_run_on_a_scheduler() {
    let scheduler = Scheduler::with_clock(SchedulerConfig::default(), FakeClock::new().shared());
    let (hits, action) = counter();
    let task = run(action, Requirements::new()).into_handle();

    scheduler.schedule(&task).unwrap();
    scheduler.run().unwrap();
    scheduler.run().unwrap();

    assert_eq!(hits.get(), 2);
}
