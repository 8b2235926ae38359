//! Error types for hetgraph-core.

use thiserror::Error;

/// Error type for heterogeneous graph operations.
#[derive(Error, Debug)]
pub enum Error {
    /// A referenced node, edge, type, path or meta-path does not exist.
    #[error("Not defined: {0}")]
    NotFound(String),

    /// A path or meta-path with the same key is already registered.
    #[error("Already defined: {0}")]
    AlreadyDefined(String),

    /// A path exists but maps to another edge type than the one given.
    #[error("Path ({source_type}, {target_type}) maps to {expected}, not {given}")]
    Conflict {
        /// Source node type of the path.
        source_type: String,
        /// Target node type of the path.
        target_type: String,
        /// Edge type currently registered for the pair.
        expected: String,
        /// Edge type supplied by the caller.
        given: String,
    },

    /// A declared edge type disagrees with the path schema.
    #[error("Edge type {declared} does not match the defined path type {expected}")]
    TypeMismatch {
        /// Type carried by the edge.
        declared: String,
        /// Type the schema maps the endpoint types to.
        expected: String,
    },

    /// The graph definition is inconsistent (e.g. an edge type cannot be inferred).
    #[error("Invalid graph definition: {0}")]
    GraphDefinition(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    /// True for [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result type for heterogeneous graph operations.
pub type Result<T> = std::result::Result<T, Error>;
