//! Graph source abstractions.
//!
//! This module defines the collaborator traits the component calculator is
//! wired with at construction time:
//!
//! - [`ProjectStore`] resolves project names and answers read-permission checks
//! - [`DependencyGraphSource`] reports a project's upstream and downstream edges
//! - [`TriggerConfigSource`] and [`CopyArtifactConfigSource`] expose the two
//!   optional plugin-derived configuration relations
//!
//! ## Design
//!
//! - Traits are synchronous and object-safe; the calculator holds `&dyn`
//!   references and never mutates a source
//! - The optional capabilities have null-object implementations
//!   ([`NoTriggerConfig`], [`NoCopyArtifactConfig`]) for deployments where the
//!   corresponding subsystem is not installed
//! - Trigger and copy-artifact configuration reference projects by *name*;
//!   the calculator resolves names through the [`ProjectStore`] and silently
//!   skips references that do not resolve

mod in_memory;

pub use in_memory::InMemoryGraph;

use crate::domain::{DependencyEdge, ProjectId};
use crate::error::Result;

/// Project repository operations.
///
/// Resolves projects by name and reports whether the current actor may read
/// them. Permission is evaluated on demand, never cached by the calculator.
pub trait ProjectStore: Send + Sync {
    /// Resolve a project by its full name.
    ///
    /// Returns `None` if no project with that name exists.
    fn resolve_name(&self, name: &str) -> Option<ProjectId>;

    /// Whether the current actor has read permission on the project.
    fn has_read_permission(&self, project: &ProjectId) -> bool;
}

/// Operations on the base build dependency graph.
pub trait DependencyGraphSource: Send + Sync {
    /// Get the edges whose downstream endpoint is the given project.
    ///
    /// Repeated calls must report comparably-equal edge values so that edge
    /// sets deduplicate across traversal rounds.
    fn upstream_dependencies(&self, project: &ProjectId) -> Result<Vec<DependencyEdge>>;

    /// Get the edges whose upstream endpoint is the given project.
    fn downstream_dependencies(&self, project: &ProjectId) -> Result<Vec<DependencyEdge>>;
}

/// Trigger configuration: which projects a project is configured to run as
/// sub-jobs.
///
/// This capability may be absent in a deployment; substitute
/// [`NoTriggerConfig`] in that case.
pub trait TriggerConfigSource: Send + Sync {
    /// The configured trigger-target names for the project.
    ///
    /// Names are returned raw; resolution (and the silent skip of unresolved
    /// references) is the calculator's concern.
    fn trigger_targets(&self, project: &ProjectId) -> Result<Vec<String>>;
}

/// Copy-artifact configuration: which projects a project copies build
/// artifacts from.
///
/// This capability may be absent in a deployment; substitute
/// [`NoCopyArtifactConfig`] in that case.
pub trait CopyArtifactConfigSource: Send + Sync {
    /// The configured artifact-source names for the project.
    fn artifact_copy_sources(&self, project: &ProjectId) -> Result<Vec<String>>;
}

/// Null implementation of [`TriggerConfigSource`] for deployments without a
/// trigger subsystem. Always reports no targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTriggerConfig;

impl TriggerConfigSource for NoTriggerConfig {
    fn trigger_targets(&self, _project: &ProjectId) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

/// Null implementation of [`CopyArtifactConfigSource`] for deployments without
/// an artifact-copy subsystem. Always reports no sources.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCopyArtifactConfig;

impl CopyArtifactConfigSource for NoCopyArtifactConfig {
    fn artifact_copy_sources(&self, _project: &ProjectId) -> Result<Vec<String>> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_capabilities_report_nothing() {
        let project = ProjectId::new("core");

        let triggers: &dyn TriggerConfigSource = &NoTriggerConfig;
        assert!(triggers.trigger_targets(&project).unwrap().is_empty());

        let copies: &dyn CopyArtifactConfigSource = &NoCopyArtifactConfig;
        assert!(copies.artifact_copy_sources(&project).unwrap().is_empty());
    }
}
