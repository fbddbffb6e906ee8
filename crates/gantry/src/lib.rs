//! Gantry - connected-component analysis for build job dependency graphs.
//!
//! Given a seed set of projects, gantry computes the connected component of
//! the build dependency graph reachable from those seeds, respecting the
//! current actor's read permissions, and folds in two plugin-derived relation
//! sets discovered along the way: configured sub-job triggers and
//! copied-artifact relations.
//!
//! The calculator is wired by dependency injection: the embedding application
//! supplies a [`graph::ProjectStore`], a [`graph::DependencyGraphSource`], and
//! implementations of the two optional capability traits (or their null
//! objects). [`graph::InMemoryGraph`] implements all four and is the easiest
//! way to get started:
//!
//! ```
//! use gantry::component::ComponentCalculator;
//! use gantry::domain::TriggerCondition;
//! use gantry::graph::InMemoryGraph;
//!
//! # fn main() -> gantry::error::Result<()> {
//! let mut graph = InMemoryGraph::new();
//! let core = graph.add_project("core");
//! let app = graph.add_project("app");
//! graph.add_dependency(&core, &app, TriggerCondition::Always)?;
//!
//! let mut calc = ComponentCalculator::new([app], &graph, &graph, &graph, &graph);
//! assert_eq!(calc.projects()?.len(), 2);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod component;
pub mod domain;
pub mod error;
pub mod graph;
