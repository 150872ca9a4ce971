// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[test]
fn defaults_match_a_20ms_loop() {
    let config = SchedulerConfig::default();
    assert_eq!(config.period, Duration::from_millis(20));
    assert!(config.warn_on_overrun);
    assert!(!config.start_disabled);
}

#[test]
fn builder_overrides_fields() {
    let config = SchedulerConfig::new()
        .with_period(Duration::from_millis(5))
        .with_overrun_warnings(false)
        .with_start_disabled(true);
    assert_eq!(config.period, Duration::from_millis(5));
    assert!(!config.warn_on_overrun);
    assert!(config.start_disabled);
}

#[parameterized(
    millis = { "period = \"10ms\"", Duration::from_millis(10) },
    seconds = { "period = \"1s\"", Duration::from_secs(1) },
    compound = { "period = \"1s 500ms\"", Duration::from_millis(1500) },
    empty = { "", DEFAULT_PERIOD },
)]
fn parses_humantime_periods(text: &str, expected: Duration) {
    let config = SchedulerConfig::from_toml_str(text).unwrap();
    assert_eq!(config.period, expected);
}

#[parameterized(
    zero_period = { "period = \"0s\"" },
    bad_duration = { "period = \"soon\"" },
    unknown_field = { "tick_rate = 50" },
    wrong_type = { "warn_on_overrun = \"yes\"" },
)]
fn rejects_invalid_documents(text: &str) {
    assert!(SchedulerConfig::from_toml_str(text).is_err());
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tickwork.toml");
    std::fs::write(&path, "period = \"50ms\"\nstart_disabled = true\n").unwrap();

    let config = SchedulerConfig::load(&path).unwrap();
    assert_eq!(config.period, Duration::from_millis(50));
    assert!(config.start_disabled);
}

#[test]
fn load_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = SchedulerConfig::load(&dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}
