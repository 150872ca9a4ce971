// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn resources_compare_by_identity_not_name() {
    let a = Resource::new("arm");
    let b = Resource::new("arm");
    assert_ne!(a, b);
    assert_eq!(a, a.clone());
}

#[test]
fn requirements_dedup_by_identity() {
    let arm = Resource::new("arm");
    let other_arm = Resource::new("arm");
    let reqs: Requirements = [arm.clone(), arm.clone(), other_arm.clone()]
        .into_iter()
        .collect();
    assert_eq!(reqs.len(), 2);
    assert!(reqs.contains(&arm));
    assert!(reqs.contains(&other_arm));
}

#[test]
fn requirements_iterate_in_creation_order() {
    let first = Resource::new("first");
    let second = Resource::new("second");
    let reqs: Requirements = [second.clone(), first.clone()].iter().collect();
    let names: Vec<_> = reqs.iter().map(Resource::name).collect();
    assert_eq!(names, vec!["first", "second"]);
}

#[test]
fn disjointness_and_intersection() {
    let arm = Resource::new("arm");
    let drive = Resource::new("drive");
    let wrist = Resource::new("wrist");

    let a: Requirements = [arm.clone(), drive.clone()].into_iter().collect();
    let b: Requirements = [drive.clone(), wrist.clone()].into_iter().collect();
    let c: Requirements = [wrist.clone()].into_iter().collect();

    assert!(!a.is_disjoint(&b));
    assert!(a.is_disjoint(&c));
    assert_eq!(a.intersection(&b).names(), "drive");
    assert_eq!(a.union(&c).len(), 3);
}

#[test]
fn empty_requirements_are_disjoint_with_everything() {
    let arm = Resource::new("arm");
    let reqs: Requirements = [arm].into_iter().collect();
    assert!(Requirements::new().is_disjoint(&reqs));
    assert!(Requirements::new().is_disjoint(&Requirements::new()));
}
