//! Text simulation specs
//!
//! Verify the demo robot's running tasks are printed tick by tick.

use crate::prelude::*;

#[test]
fn prints_one_line_per_tick() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["simulate", "--ticks", "3"])
        .passes()
        .stdout_eq(
            "tick 1: DriveTeleop, ArmHold\n\
             tick 2: DriveTeleop, ArmHold\n\
             tick 3: DriveTeleop, ArmRoutine\n",
        );
}

#[test]
fn park_takes_over_the_whole_robot() {
    let temp = Project::empty();

    let run = temp.tickwork().args(&["simulate", "--ticks", "20"]).passes();
    let lines = run.lines();

    assert_eq!(lines.len(), 20);
    assert_eq!(lines[14], "tick 15: Park");
    assert_eq!(lines[19], "tick 20: DriveTeleop, ArmHold");
}

#[test]
fn zero_ticks_prints_nothing() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["simulate", "--ticks", "0"])
        .passes()
        .stdout_eq("");
}

#[test]
fn disabled_start_runs_nothing() {
    let temp = Project::empty();
    temp.file("tickwork.toml", "start_disabled = true\n");

    temp.tickwork()
        .args(&["simulate", "--ticks", "2", "--config", "tickwork.toml"])
        .passes()
        .stdout_eq("tick 1: (idle)\ntick 2: (idle)\n");
}

#[test]
fn realtime_paces_against_the_wall_clock() {
    let temp = Project::empty();
    temp.file("tickwork.toml", "period = \"5ms\"\nwarn_on_overrun = false\n");

    let run = temp
        .tickwork()
        .args(&["simulate", "--ticks", "4", "--realtime", "--config", "tickwork.toml"])
        .passes();

    assert_eq!(run.lines().len(), 4);
    assert!(run.lines()[3].contains("ArmRoutine"));
}

#[test]
fn logs_go_to_stderr() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["simulate", "--ticks", "3"])
        .env("RUST_LOG", "info")
        .passes()
        .stderr_has("simulation starting")
        .stderr_has("arm raised");
}
