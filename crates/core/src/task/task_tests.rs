// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::probe::{Probe, ProbeEvent, ProbeTask};
use crate::resource::Resource;

struct Plain;

impl Task for Plain {}

#[test]
fn default_task_policy() {
    let mut task = Plain;
    assert!(!task.is_finished());
    assert!(task.requirements().is_empty());
    assert_eq!(task.interruption_behavior(), InterruptionBehavior::CancelSelf);
    assert!(!task.runs_when_disabled());
    assert_eq!(task.name(), "Plain");
}

#[test]
fn boxed_task_forwards_everything() {
    let probe = Probe::new();
    let arm = Resource::new("arm");
    let mut boxed: Box<dyn Task> = Box::new(
        ProbeTask::new(&probe)
            .named("boxed")
            .requiring([&arm])
            .with_interruption(InterruptionBehavior::CancelIncoming),
    );

    boxed.initialize();
    boxed.execute();
    boxed.end(true);

    assert_eq!(boxed.name(), "boxed");
    assert!(boxed.requirements().contains(&arm));
    assert_eq!(
        boxed.interruption_behavior(),
        InterruptionBehavior::CancelIncoming
    );
    assert_eq!(
        probe.events(),
        vec![
            ProbeEvent::Initialize,
            ProbeEvent::Execute,
            ProbeEvent::End { interrupted: true }
        ]
    );
}

#[test]
fn short_type_name_strips_paths_and_generics() {
    assert_eq!(short_type_name("a::b::Wait"), "Wait");
    assert_eq!(short_type_name("a::Timeout<b::c::Probe>"), "Timeout");
    assert_eq!(short_type_name("Plain"), "Plain");
}

#[test]
fn requirements_disjoint_compares_resource_sets() {
    let probe = Probe::new();
    let arm = Resource::new("arm");
    let drive = Resource::new("drive");
    let a = ProbeTask::new(&probe).requiring([&arm]);
    let b = ProbeTask::new(&probe).requiring([&drive]);
    let c = ProbeTask::new(&probe).requiring([&arm, &drive]);

    assert!(requirements_disjoint(&a, &b));
    assert!(!requirements_disjoint(&a, &c));
    assert!(requirements_disjoint(&Plain, &c));
}

#[test]
fn stepper_initializes_once_and_ends_normally() {
    let probe = Probe::new();
    let mut task = ProbeTask::new(&probe).finishing_after(3);

    let ticks: Vec<usize> = StepIter::new(&mut task).collect();

    assert_eq!(ticks, vec![1, 2, 3]);
    assert_eq!(probe.initialize_count(), 1);
    assert_eq!(probe.execute_count(), 3);
    assert_eq!(probe.end_calls(), vec![false]);
}

#[test]
fn stepper_dropped_mid_run_interrupts() {
    let probe = Probe::new();
    let mut task = ProbeTask::new(&probe);

    {
        let mut steps = StepIter::new(&mut task);
        steps.next();
        steps.next();
        assert!(!steps.is_done());
    }

    assert_eq!(probe.execute_count(), 2);
    assert_eq!(probe.end_calls(), vec![true]);
}

#[test]
fn stepper_never_started_does_not_end() {
    let probe = Probe::new();
    let mut task = ProbeTask::new(&probe);
    drop(StepIter::new(&mut task));
    assert!(probe.events().is_empty());
}

#[test]
fn run_to_completion_caps_ticks() {
    let probe = Probe::new();
    let mut task = ProbeTask::new(&probe);
    assert_eq!(run_to_completion(&mut task, 5), 5);
    assert_eq!(probe.end_calls(), vec![true]);

    let probe = Probe::new();
    let mut task = ProbeTask::new(&probe).finishing_after(2);
    assert_eq!(run_to_completion(&mut task, 5), 2);
    assert_eq!(probe.end_calls(), vec![false]);
}

#[test]
fn handle_caches_policy_and_rejects_requirements_once_composed() {
    let probe = Probe::new();
    let arm = Resource::new("arm");
    let drive = Resource::new("drive");
    let handle = TaskHandle::new(ProbeTask::new(&probe).named("lift").requiring([&arm]));

    assert_eq!(handle.name(), "lift");
    handle.add_requirements([drive.clone()]).unwrap();
    assert!(handle.has_requirement(&drive));

    handle.mark_composed().unwrap();
    assert!(handle.is_composed());
    assert!(handle.add_requirements([Resource::new("wrist")]).is_err());
    assert!(handle.mark_composed().is_err());

    handle.clear_composed();
    assert!(!handle.is_composed());
}

#[test]
fn handle_identity_survives_clone() {
    let probe = Probe::new();
    let a = TaskHandle::new(ProbeTask::new(&probe));
    let b = TaskHandle::new(ProbeTask::new(&probe));
    assert_eq!(a, a.clone());
    assert!(a.ptr_eq(&a.clone()));
    assert_ne!(a, b);
}
