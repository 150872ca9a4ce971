//! Config command specs
//!
//! Verify the effective configuration is printed as JSON.

use crate::prelude::*;

#[test]
fn defaults_are_printed_without_a_file() {
    let temp = Project::empty();

    let run = temp.tickwork().args(&["config"]).passes();
    let config: serde_json::Value = serde_json::from_str(run.stdout()).unwrap();

    assert_eq!(
        config,
        serde_json::json!({
            "period": "20ms",
            "warn_on_overrun": true,
            "start_disabled": false,
        })
    );
}

#[test]
fn file_values_override_defaults() {
    let temp = Project::empty();
    temp.file("tickwork.toml", "period = \"10ms\"\nstart_disabled = true\n");

    temp.tickwork()
        .args(&["config", "--config", "tickwork.toml"])
        .passes()
        .stdout_has("\"period\": \"10ms\"")
        .stdout_has("\"start_disabled\": true")
        .stdout_has("\"warn_on_overrun\": true");
}
