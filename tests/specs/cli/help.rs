//! Help output specs
//!
//! Verify the CLI describes its commands.

use crate::prelude::*;

#[test]
fn help_lists_commands() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["--help"])
        .passes()
        .stdout_has("simulate")
        .stdout_has("config");
}

#[test]
fn simulate_help_lists_options() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["simulate", "--help"])
        .passes()
        .stdout_has("--ticks")
        .stdout_has("--realtime")
        .stdout_has("--format");
}

#[test]
fn version_is_reported() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["--version"])
        .passes()
        .stdout_has("tickwork");
}
