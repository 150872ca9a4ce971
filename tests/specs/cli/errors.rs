//! CLI error specs
//!
//! Verify bad input exits non-zero with a useful message.

use crate::prelude::*;

#[test]
fn unknown_command_fails() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["launch"])
        .fails()
        .stderr_has("unrecognized subcommand");
}

#[test]
fn missing_config_file_fails() {
    let temp = Project::empty();

    temp.tickwork()
        .args(&["simulate", "--config", "nope.toml"])
        .fails()
        .stderr_has("failed to read");
}

#[test]
fn zero_period_is_rejected() {
    let temp = Project::empty();
    temp.file("tickwork.toml", "period = \"0s\"\n");

    temp.tickwork()
        .args(&["simulate", "--config", "tickwork.toml"])
        .fails()
        .stderr_has("period must be greater than zero");
}

#[test]
fn unknown_config_keys_are_rejected() {
    let temp = Project::empty();
    temp.file("tickwork.toml", "tick_rate = 50\n");

    temp.tickwork()
        .args(&["config", "--config", "tickwork.toml"])
        .fails()
        .stderr_has("invalid config");
}
