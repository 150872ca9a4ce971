// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn system_clock_returns_increasing_time() {
    let clock = SystemClock;
    let t1 = clock.now();
    std::thread::sleep(Duration::from_millis(1));
    let t2 = clock.now();
    assert!(t2 > t1);
}

#[test]
fn fake_clock_can_be_advanced() {
    let clock = FakeClock::new();
    let t1 = clock.now();
    clock.advance(Duration::from_secs(60));
    assert_eq!(clock.since(t1), Duration::from_secs(60));
}

#[test]
fn fake_clock_shared_handle_observes_advances() {
    let clock = FakeClock::new();
    let shared = clock.shared();
    let t1 = shared.now();
    clock.advance(Duration::from_millis(20));
    assert_eq!(shared.since(t1), Duration::from_millis(20));
}

#[test]
fn since_saturates_for_future_instants() {
    let clock = FakeClock::new();
    let future = clock.now() + Duration::from_secs(5);
    assert_eq!(clock.since(future), Duration::ZERO);
}
