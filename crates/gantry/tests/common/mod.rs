//! Common test utilities shared across integration tests.

use gantry::domain::{DependencyEdge, ProjectId, TriggerCondition};
use gantry::graph::InMemoryGraph;

/// Shorthand for a project ID
pub fn id(name: &str) -> ProjectId {
    ProjectId::new(name)
}

/// Shorthand for an `Always`-conditioned edge between two named projects
pub fn edge(upstream: &str, downstream: &str) -> DependencyEdge {
    DependencyEdge::new(upstream, downstream)
}

/// Build a graph from `upstream -> downstream` name pairs, registering
/// projects on first mention.
pub fn graph_from_edges(edges: &[(&str, &str)]) -> InMemoryGraph {
    let mut graph = InMemoryGraph::new();
    for (upstream, downstream) in edges {
        let up = graph.add_project(*upstream);
        let down = graph.add_project(*downstream);
        graph
            .add_dependency(&up, &down, TriggerCondition::Always)
            .expect("endpoints were just registered");
    }
    graph
}
