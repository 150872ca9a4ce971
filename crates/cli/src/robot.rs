// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Demo robot wired onto a scheduler
//!
//! Two resources with default tasks, an arm routine bound to a simulated
//! button and a park manoeuvre that claims the whole robot and refuses
//! interruption.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;
use tickwork_core::factory;
use tickwork_core::{
    InterruptionBehavior, LifecycleEvent, Requirements, Resource, Scheduler, SchedulerError,
    SharedClock, Trigger,
};

/// Button pressed on ticks 3..6 of every 20
const ARM_BUTTON: std::ops::Range<u64> = 3..6;
/// Park requested on tick 15 of every 20
const PARK_TICK: u64 = 15;
const CYCLE: u64 = 20;

pub struct Robot {
    tick: Rc<Cell<u64>>,
    drive_cycles: Rc<Cell<u64>>,
}

impl Robot {
    pub fn build(
        scheduler: &Scheduler,
        clock: SharedClock,
        period: Duration,
    ) -> Result<Self, SchedulerError> {
        let drivetrain = Resource::new("drivetrain");
        let arm = Resource::new("arm");
        let tick = Rc::new(Cell::new(0));
        let drive_cycles = Rc::new(Cell::new(0));

        scheduler.register_resource(&arm);
        let odometry = tick.clone();
        scheduler.register_periodic(&drivetrain, move || {
            tracing::trace!(tick = odometry.get(), "drivetrain odometry");
        });
        scheduler.on_lifecycle(|event, task| match event {
            LifecycleEvent::Executed => tracing::trace!(task = task.name(), "executed"),
            _ => tracing::info!(task = task.name(), ?event, "lifecycle"),
        });

        let cycles = drive_cycles.clone();
        let teleop = factory::run(move || cycles.set(cycles.get() + 1), only(&drivetrain))
            .with_name("DriveTeleop")
            .into_handle();
        scheduler.set_default_task(&drivetrain, &teleop)?;

        let hold = factory::idle(only(&arm)).with_name("ArmHold").into_handle();
        scheduler.set_default_task(&arm, &hold)?;

        let routine = factory::sequence(vec![
            factory::run_once(|| tracing::info!("arm raised"), only(&arm)),
            factory::wait_on(period * 3, clock.clone()),
            factory::run_once(|| tracing::info!("arm lowered"), only(&arm)),
        ])
        .with_timeout_on(period * 10, clock.clone())
        .with_name("ArmRoutine")
        .into_handle();
        let button = tick.clone();
        Trigger::new(scheduler, move || ARM_BUTTON.contains(&(button.get() % CYCLE)))
            .on_true(routine);

        let park = factory::wait_on(period * 4, clock)
            .before_starting(
                || tracing::info!("parking"),
                [&drivetrain, &arm].into_iter().collect(),
            )
            .with_interrupt_behavior(InterruptionBehavior::CancelIncoming)
            .with_name("Park")
            .into_handle();
        let request = tick.clone();
        Trigger::new(scheduler, move || request.get() % CYCLE == PARK_TICK).on_true(park);

        Ok(Self { tick, drive_cycles })
    }

    /// Publish the tick about to run to the simulated inputs
    pub fn set_tick(&self, tick: u64) {
        self.tick.set(tick);
    }

    /// How many times the teleop drive task has executed
    pub fn drive_cycles(&self) -> u64 {
        self.drive_cycles.get()
    }
}

fn only(resource: &Resource) -> Requirements {
    [resource].into_iter().collect()
}

#[cfg(test)]
#[path = "robot_tests.rs"]
mod tests;
