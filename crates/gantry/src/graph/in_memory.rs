//! In-memory graph source backed by petgraph.
//!
//! This is the assemble-by-hand implementation of the graph source traits,
//! suitable for tests, fixtures, and embedders that already hold the whole
//! graph in memory.
//!
//! # Architecture
//!
//! - `petgraph::DiGraph` for the dependency graph itself
//! - `HashMap<ProjectId, NodeIndex>` for O(1) project-to-node lookups
//! - a restricted-project set driving read-permission checks
//! - per-project trigger-target and artifact-copy-source name lists
//!
//! ## Edge Direction Convention
//!
//! Edges point from **upstream to downstream**: the source of an edge is the
//! project being depended upon, the target is the project that depends on it.
//! Edge weights carry the [`TriggerCondition`] reported back on queries.
//!
//! # Mutation
//!
//! The mutation API exists for graph assembly before a traversal. The source
//! traits themselves are read-only; a calculator mid-traversal never observes
//! mutation because it is wired to a shared borrow.

use crate::domain::{DependencyEdge, ProjectId, TriggerCondition};
use crate::error::{Error, Result};
use crate::graph::{
    CopyArtifactConfigSource, DependencyGraphSource, ProjectStore, TriggerConfigSource,
};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// In-memory implementation of all four graph source traits.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    /// Dependency graph; nodes are project IDs, weights are trigger conditions.
    graph: DiGraph<ProjectId, TriggerCondition>,

    /// Mapping from project ID to graph node.
    node_map: HashMap<ProjectId, NodeIndex>,

    /// Projects the current actor may not read.
    restricted: HashSet<ProjectId>,

    /// Configured trigger-target names, keyed by the triggering project.
    triggers: HashMap<ProjectId, Vec<String>>,

    /// Configured artifact-source names, keyed by the copying project.
    copy_sources: HashMap<ProjectId, Vec<String>>,
}

impl InMemoryGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a project, returning its ID.
    ///
    /// Registering the same name twice is a no-op returning the same ID.
    pub fn add_project(&mut self, name: impl Into<String>) -> ProjectId {
        let id = ProjectId::new(name);
        if !self.node_map.contains_key(&id) {
            let node = self.graph.add_node(id.clone());
            self.node_map.insert(id.clone(), node);
        }
        id
    }

    /// Add a dependency edge from `upstream` to `downstream`.
    ///
    /// Adding the same (upstream, downstream, condition) triple twice is a
    /// no-op, so queries report each edge at most once per direction.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if either endpoint is unregistered.
    pub fn add_dependency(
        &mut self,
        upstream: &ProjectId,
        downstream: &ProjectId,
        condition: TriggerCondition,
    ) -> Result<()> {
        let up = self.node_of(upstream)?;
        let down = self.node_of(downstream)?;

        let exists = self
            .graph
            .edges_connecting(up, down)
            .any(|edge| *edge.weight() == condition);
        if !exists {
            self.graph.add_edge(up, down, condition);
        }
        Ok(())
    }

    /// Revoke the current actor's read permission on a project.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if the project is unregistered.
    pub fn restrict(&mut self, project: &ProjectId) -> Result<()> {
        self.node_of(project)?;
        self.restricted.insert(project.clone());
        Ok(())
    }

    /// Configure `project` to trigger a sub-job by name.
    ///
    /// The target name is stored raw; it need not refer to a registered
    /// project (unresolved references are the calculator's silent-skip case).
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if the triggering project is
    /// unregistered.
    pub fn add_trigger(&mut self, project: &ProjectId, target_name: impl Into<String>) -> Result<()> {
        self.node_of(project)?;
        self.triggers
            .entry(project.clone())
            .or_default()
            .push(target_name.into());
        Ok(())
    }

    /// Configure `project` to copy build artifacts from a project by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProjectNotFound` if the copying project is
    /// unregistered.
    pub fn add_copy_artifact(
        &mut self,
        project: &ProjectId,
        source_name: impl Into<String>,
    ) -> Result<()> {
        self.node_of(project)?;
        self.copy_sources
            .entry(project.clone())
            .or_default()
            .push(source_name.into());
        Ok(())
    }

    /// Number of registered projects
    pub fn project_count(&self) -> usize {
        self.node_map.len()
    }

    fn node_of(&self, project: &ProjectId) -> Result<NodeIndex> {
        self.node_map
            .get(project)
            .copied()
            .ok_or_else(|| Error::ProjectNotFound(project.clone()))
    }
}

impl ProjectStore for InMemoryGraph {
    fn resolve_name(&self, name: &str) -> Option<ProjectId> {
        let id = ProjectId::new(name);
        self.node_map.contains_key(&id).then_some(id)
    }

    fn has_read_permission(&self, project: &ProjectId) -> bool {
        self.node_map.contains_key(project) && !self.restricted.contains(project)
    }
}

impl DependencyGraphSource for InMemoryGraph {
    fn upstream_dependencies(&self, project: &ProjectId) -> Result<Vec<DependencyEdge>> {
        let node = self.node_of(project)?;
        Ok(self
            .graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| {
                DependencyEdge::with_condition(
                    self.graph[edge.source()].clone(),
                    project.clone(),
                    *edge.weight(),
                )
            })
            .collect())
    }

    fn downstream_dependencies(&self, project: &ProjectId) -> Result<Vec<DependencyEdge>> {
        let node = self.node_of(project)?;
        Ok(self
            .graph
            .edges_directed(node, Direction::Outgoing)
            .map(|edge| {
                DependencyEdge::with_condition(
                    project.clone(),
                    self.graph[edge.target()].clone(),
                    *edge.weight(),
                )
            })
            .collect())
    }
}

impl TriggerConfigSource for InMemoryGraph {
    fn trigger_targets(&self, project: &ProjectId) -> Result<Vec<String>> {
        Ok(self.triggers.get(project).cloned().unwrap_or_default())
    }
}

impl CopyArtifactConfigSource for InMemoryGraph {
    fn artifact_copy_sources(&self, project: &ProjectId) -> Result<Vec<String>> {
        Ok(self.copy_sources.get(project).cloned().unwrap_or_default())
    }
}
