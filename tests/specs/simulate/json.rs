//! JSON simulation specs
//!
//! Verify each tick is a standalone JSON object.

use crate::prelude::*;

#[test]
fn each_line_is_a_tick_report() {
    let temp = Project::empty();

    let run = temp
        .tickwork()
        .args(&["simulate", "--ticks", "3", "--format", "json"])
        .passes();

    let reports: Vec<serde_json::Value> = run
        .lines()
        .into_iter()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(reports.len(), 3);
    for (i, report) in reports.iter().enumerate() {
        assert_eq!(report["tick"], i as u64 + 1);
        assert_eq!(
            report["names"].as_array().unwrap().len(),
            report["ids"].as_array().unwrap().len()
        );
    }
    assert_eq!(reports[2]["names"], serde_json::json!(["DriveTeleop", "ArmRoutine"]));
}
