// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resources and requirement sets
//!
//! A [`Resource`] is a mutually-exclusive claimable entity (a drivetrain, an
//! arm, a logical mode). Tasks declare the resources they need as a
//! [`Requirements`] set; the scheduler guarantees at most one task holds a
//! resource at any instant.

use crate::id::ResourceId;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Handle to a claimable resource
///
/// Cloning yields the same resource. Equality, hashing and ordering use the
/// process-unique id, never the name.
#[derive(Clone)]
pub struct Resource {
    id: ResourceId,
    name: Arc<str>,
}

impl Resource {
    pub fn new(name: impl Into<String>) -> Self {
        let name: String = name.into();
        Self {
            id: ResourceId::next(),
            name: Arc::from(name),
        }
    }

    pub fn id(&self) -> ResourceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Resource {}

impl std::hash::Hash for Resource {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl PartialOrd for Resource {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Resource {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::fmt::Debug for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

impl std::fmt::Display for Resource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Deduplicated set of resources a task claims
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Requirements {
    resources: BTreeSet<Resource>,
}

impl Requirements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a resource; returns false if it was already present
    pub fn insert(&mut self, resource: Resource) -> bool {
        self.resources.insert(resource)
    }

    pub fn extend(&mut self, resources: impl IntoIterator<Item = Resource>) {
        self.resources.extend(resources);
    }

    pub fn contains(&self, resource: &Resource) -> bool {
        self.resources.contains(resource)
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Resource> {
        self.resources.iter()
    }

    /// True iff the two sets share no resource
    pub fn is_disjoint(&self, other: &Requirements) -> bool {
        self.resources.is_disjoint(&other.resources)
    }

    /// Resources present in both sets
    pub fn intersection(&self, other: &Requirements) -> Requirements {
        self.resources
            .intersection(&other.resources)
            .cloned()
            .collect()
    }

    pub fn union(&self, other: &Requirements) -> Requirements {
        self.resources.union(&other.resources).cloned().collect()
    }

    /// Resource names, comma separated, for error messages and logs
    pub fn names(&self) -> String {
        self.resources
            .iter()
            .map(Resource::name)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl FromIterator<Resource> for Requirements {
    fn from_iter<I: IntoIterator<Item = Resource>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().collect(),
        }
    }
}

impl<'a> FromIterator<&'a Resource> for Requirements {
    fn from_iter<I: IntoIterator<Item = &'a Resource>>(iter: I) -> Self {
        iter.into_iter().cloned().collect()
    }
}

impl IntoIterator for Requirements {
    type Item = Resource;
    type IntoIter = btree_set::IntoIter<Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.into_iter()
    }
}

impl<'a> IntoIterator for &'a Requirements {
    type Item = &'a Resource;
    type IntoIter = btree_set::Iter<'a, Resource>;

    fn into_iter(self) -> Self::IntoIter {
        self.resources.iter()
    }
}

#[cfg(test)]
#[path = "resource_tests.rs"]
mod tests;
