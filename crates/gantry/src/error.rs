//! Error types for gantry graph operations.

use crate::domain::ProjectId;
use thiserror::Error;

/// The error type for gantry graph operations.
///
/// The component calculator itself has no failure modes of its own; errors
/// originate in the graph sources and are propagated to the caller unmodified.
#[derive(Debug, Error)]
pub enum Error {
    /// A graph source was asked about a project it does not know.
    #[error("project not found: {0}")]
    ProjectNotFound(ProjectId),

    /// Backend-specific failure of a graph source.
    #[error("graph source error: {0}")]
    Source(String),
}

/// A specialized Result type for gantry operations.
pub type Result<T> = std::result::Result<T, Error>;
