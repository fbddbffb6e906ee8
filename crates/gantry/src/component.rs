//! Connected-component calculation over the build dependency graph.
//!
//! [`ComponentCalculator`] computes the connected component containing a seed
//! set of projects. Starting from the seeds it expands breadth-first across
//! dependency edges in both directions, admitting only endpoints the current
//! actor may read, until no new projects are discovered. Along the way it
//! collects two plugin-derived relation sets that are not part of the base
//! graph: configured sub-job triggers and copied-artifact relations.
//!
//! # Lifecycle
//!
//! A calculator is constructed per request with an immutable seed set and
//! borrows of its collaborators. The expansion runs lazily, at most once, on
//! the first accessor call; after that every accessor returns the same stable
//! result. Instances are not meant to be shared across threads or reused
//! across requests.
//!
//! # Permissions
//!
//! A project without read permission never enters the result through a
//! dependency edge: the far endpoint of every edge is checked before the edge
//! is admitted. Seeds are exempt from the check (the caller already holds
//! them) but are not expanded when unreadable. Sub-job and copied-artifact
//! targets are recorded without a permission check, matching the behavior of
//! the trigger and copy-artifact subsystems themselves.

use crate::domain::{DependencyEdge, ProjectId};
use crate::error::Result;
use crate::graph::{
    CopyArtifactConfigSource, DependencyGraphSource, ProjectStore, TriggerConfigSource,
};
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

/// Which end of an edge is the far endpoint during expansion.
#[derive(Clone, Copy)]
enum FarEnd {
    Upstream,
    Downstream,
}

/// Calculator for the connected component of the dependency graph containing
/// a set of seed projects.
///
/// After calculation the component's projects, dependency edges, sub-job
/// relations, and copied-artifact relations can each be read back through the
/// lazy accessors.
pub struct ComponentCalculator<'a> {
    store: &'a dyn ProjectStore,
    graph: &'a dyn DependencyGraphSource,
    triggers: &'a dyn TriggerConfigSource,
    copies: &'a dyn CopyArtifactConfigSource,

    visited_projects: HashSet<ProjectId>,
    visited_dependencies: HashSet<DependencyEdge>,
    sub_jobs: BTreeMap<ProjectId, Vec<ProjectId>>,
    copied_artifacts: HashSet<DependencyEdge>,
    calculated: bool,
}

impl<'a> ComponentCalculator<'a> {
    /// Create a calculator for the component containing `seeds`.
    ///
    /// Seeds enter the visited set as-is, without a permission check; only
    /// projects discovered beyond the seed set are filtered. Deployments
    /// without a trigger or copy-artifact subsystem pass
    /// [`NoTriggerConfig`](crate::graph::NoTriggerConfig) /
    /// [`NoCopyArtifactConfig`](crate::graph::NoCopyArtifactConfig).
    pub fn new(
        seeds: impl IntoIterator<Item = ProjectId>,
        store: &'a dyn ProjectStore,
        graph: &'a dyn DependencyGraphSource,
        triggers: &'a dyn TriggerConfigSource,
        copies: &'a dyn CopyArtifactConfigSource,
    ) -> Self {
        Self {
            store,
            graph,
            triggers,
            copies,
            visited_projects: seeds.into_iter().collect(),
            visited_dependencies: HashSet::new(),
            sub_jobs: BTreeMap::new(),
            copied_artifacts: HashSet::new(),
            calculated: false,
        }
    }

    /// Run the fixed-point expansion if it has not run yet.
    ///
    /// Idempotent: only the first successful call does any work. On a graph
    /// source failure the error propagates unmodified and the calculator
    /// stays uncalculated, so a later call retries.
    ///
    /// # Errors
    ///
    /// Forwards any error returned by the graph or capability sources.
    pub fn calculate_if_needed(&mut self) -> Result<()> {
        if self.calculated {
            return Ok(());
        }
        let seeds = self.visited_projects.clone();
        self.expand(seeds)?;
        self.calculated = true;
        Ok(())
    }

    /// Projects (nodes) in the connected component.
    ///
    /// Always a superset of the seed set; every other member is reachable
    /// from a seed through a permission-respecting chain of edges, ignoring
    /// direction.
    ///
    /// # Errors
    ///
    /// Forwards any error from the lazy calculation.
    pub fn projects(&mut self) -> Result<&HashSet<ProjectId>> {
        self.calculate_if_needed()?;
        Ok(&self.visited_projects)
    }

    /// Dependency edges in the connected component.
    ///
    /// # Errors
    ///
    /// Forwards any error from the lazy calculation.
    pub fn dependencies(&mut self) -> Result<&HashSet<DependencyEdge>> {
        self.calculate_if_needed()?;
        Ok(&self.visited_dependencies)
    }

    /// Sub-job relations, keyed by the triggering project.
    ///
    /// Values preserve every configured target, duplicates included. Targets
    /// are recorded only; they do not extend the traversal frontier.
    ///
    /// # Errors
    ///
    /// Forwards any error from the lazy calculation.
    pub fn sub_jobs(&mut self) -> Result<&BTreeMap<ProjectId, Vec<ProjectId>>> {
        self.calculate_if_needed()?;
        Ok(&self.sub_jobs)
    }

    /// Copied-artifact relations, as edges from the artifact's producer to
    /// the copying project.
    ///
    /// # Errors
    ///
    /// Forwards any error from the lazy calculation.
    pub fn copied_artifacts(&mut self) -> Result<&HashSet<DependencyEdge>> {
        self.calculate_if_needed()?;
        Ok(&self.copied_artifacts)
    }

    /// Breadth-first fixed-point expansion.
    ///
    /// Each round expands every readable frontier project; the next frontier
    /// is the set of newly admitted, not-yet-visited far endpoints. The
    /// visited-edge set keeps an edge from being reprocessed when the
    /// traversal later reaches its other endpoint.
    fn expand(&mut self, mut frontier: HashSet<ProjectId>) -> Result<()> {
        let mut round = 0usize;
        while !frontier.is_empty() {
            round += 1;
            let mut next = HashSet::new();

            for project in &frontier {
                // Permission is evaluated per round, not cached.
                if !self.store.has_read_permission(project) {
                    continue;
                }

                let upstream = self.graph.upstream_dependencies(project)?;
                next.extend(self.admit_edges(upstream, FarEnd::Upstream));

                let downstream = self.graph.downstream_dependencies(project)?;
                next.extend(self.admit_edges(downstream, FarEnd::Downstream));

                self.record_sub_jobs(project)?;
                self.record_copied_artifacts(project)?;
            }

            debug!(round, discovered = next.len(), "component expansion round");
            self.visited_projects.extend(next.iter().cloned());
            frontier = next;
        }
        Ok(())
    }

    /// Admit new edges into the visited-edge set, returning the far endpoints
    /// that have not been visited yet.
    ///
    /// An edge is admitted only if it is new and its far endpoint is
    /// readable; an unreadable endpoint drops the edge entirely.
    fn admit_edges(&mut self, edges: Vec<DependencyEdge>, far: FarEnd) -> HashSet<ProjectId> {
        let mut fresh = HashSet::new();
        for edge in edges {
            let endpoint = match far {
                FarEnd::Upstream => &edge.upstream,
                FarEnd::Downstream => &edge.downstream,
            };
            if self.store.has_read_permission(endpoint)
                && !self.visited_dependencies.contains(&edge)
            {
                if !self.visited_projects.contains(endpoint) {
                    fresh.insert(endpoint.clone());
                }
                self.visited_dependencies.insert(edge);
            }
        }
        fresh
    }

    /// Record the project's configured sub-job targets.
    ///
    /// Unresolved target names are skipped. No permission filter applies to
    /// resolved targets.
    fn record_sub_jobs(&mut self, project: &ProjectId) -> Result<()> {
        for name in self.triggers.trigger_targets(project)? {
            if let Some(target) = self.store.resolve_name(&name) {
                self.sub_jobs
                    .entry(project.clone())
                    .or_default()
                    .push(target);
            }
        }
        Ok(())
    }

    /// Record the project's configured copied-artifact relations as edges
    /// from the artifact source to the copying project.
    ///
    /// Unresolved source names are skipped. No permission filter applies to
    /// resolved sources.
    fn record_copied_artifacts(&mut self, project: &ProjectId) -> Result<()> {
        for name in self.copies.artifact_copy_sources(project)? {
            if let Some(source) = self.store.resolve_name(&name) {
                self.copied_artifacts
                    .insert(DependencyEdge::new(source, project.clone()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TriggerCondition;
    use crate::graph::{InMemoryGraph, NoCopyArtifactConfig, NoTriggerConfig};

    fn calculator<'a>(
        seeds: impl IntoIterator<Item = ProjectId>,
        graph: &'a InMemoryGraph,
    ) -> ComponentCalculator<'a> {
        ComponentCalculator::new(seeds, graph, graph, graph, graph)
    }

    #[test]
    fn empty_seed_set_yields_empty_component() {
        let graph = InMemoryGraph::new();
        let mut calc = calculator([], &graph);

        assert!(calc.projects().unwrap().is_empty());
        assert!(calc.dependencies().unwrap().is_empty());
        assert!(calc.sub_jobs().unwrap().is_empty());
        assert!(calc.copied_artifacts().unwrap().is_empty());
    }

    #[test]
    fn seeds_survive_even_without_read_permission() {
        let mut graph = InMemoryGraph::new();
        let a = graph.add_project("a");
        graph.restrict(&a).unwrap();

        let mut calc = calculator([a.clone()], &graph);
        assert_eq!(calc.projects().unwrap(), &HashSet::from([a]));
        assert!(calc.dependencies().unwrap().is_empty());
    }

    #[test]
    fn expansion_walks_both_directions() {
        // up -> seed -> down, seeded in the middle.
        let mut graph = InMemoryGraph::new();
        let up = graph.add_project("up");
        let seed = graph.add_project("seed");
        let down = graph.add_project("down");
        graph
            .add_dependency(&up, &seed, TriggerCondition::Always)
            .unwrap();
        graph
            .add_dependency(&seed, &down, TriggerCondition::Always)
            .unwrap();

        let mut calc = calculator([seed.clone()], &graph);
        assert_eq!(
            calc.projects().unwrap(),
            &HashSet::from([up, seed, down])
        );
        assert_eq!(calc.dependencies().unwrap().len(), 2);
    }

    #[test]
    fn diamond_edges_are_recorded_once() {
        // a -> b -> d and a -> c -> d; every edge reachable from both ends.
        let mut graph = InMemoryGraph::new();
        let a = graph.add_project("a");
        let b = graph.add_project("b");
        let c = graph.add_project("c");
        let d = graph.add_project("d");
        for (up, down) in [(&a, &b), (&a, &c), (&b, &d), (&c, &d)] {
            graph
                .add_dependency(up, down, TriggerCondition::Always)
                .unwrap();
        }

        let mut calc = calculator([a.clone()], &graph);
        assert_eq!(calc.projects().unwrap().len(), 4);
        assert_eq!(calc.dependencies().unwrap().len(), 4);
    }

    #[test]
    fn null_capabilities_leave_relation_sets_empty() {
        let mut graph = InMemoryGraph::new();
        let a = graph.add_project("a");
        graph.add_trigger(&a, "b").unwrap();

        let mut calc =
            ComponentCalculator::new([a], &graph, &graph, &NoTriggerConfig, &NoCopyArtifactConfig);
        assert!(calc.sub_jobs().unwrap().is_empty());
        assert!(calc.copied_artifacts().unwrap().is_empty());
    }
}
