//! Domain types for build dependency graphs.
//!
//! This module contains the core domain types shared by the graph sources
//! and the component calculator.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a project.
///
/// The identifier is the project's full name, which is also the key used by
/// trigger and copy-artifact configuration references.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(pub String);

impl ProjectId {
    /// Create a new project ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The project's full name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ProjectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ProjectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Condition under which a dependency edge triggers the downstream build.
///
/// Graph sources attach this to the edges they report. It participates in
/// edge equality, so the same edge reported twice deduplicates while edges
/// that differ only in condition are kept apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerCondition {
    /// Downstream build fires regardless of the upstream result
    #[default]
    Always,

    /// Downstream build fires only after a stable upstream build
    StableOnly,

    /// Downstream build fires even after an unstable upstream build
    Unstable,
}

/// A directed dependency edge between two projects.
///
/// The edge points from the project being depended upon (`upstream`) to the
/// project that depends on it (`downstream`). Copied-artifact relations reuse
/// this shape with the source project as `upstream` and the copying project
/// as `downstream`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DependencyEdge {
    /// The project being depended upon
    pub upstream: ProjectId,

    /// The project that depends on `upstream`
    pub downstream: ProjectId,

    /// Trigger condition attached by the graph source
    pub condition: TriggerCondition,
}

impl DependencyEdge {
    /// Create an edge with the default [`TriggerCondition::Always`].
    ///
    /// Copied-artifact edges are built this way since artifact copying has
    /// no trigger threshold of its own.
    pub fn new(upstream: impl Into<ProjectId>, downstream: impl Into<ProjectId>) -> Self {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into(),
            condition: TriggerCondition::Always,
        }
    }

    /// Create an edge with an explicit trigger condition
    pub fn with_condition(
        upstream: impl Into<ProjectId>,
        downstream: impl Into<ProjectId>,
        condition: TriggerCondition,
    ) -> Self {
        Self {
            upstream: upstream.into(),
            downstream: downstream.into(),
            condition,
        }
    }
}

impl fmt::Display for DependencyEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.upstream, self.downstream)
    }
}
