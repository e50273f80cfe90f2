//! Graph store for materializing crawled entities
//!
//! This module defines the trait interface the traversal engine writes
//! through, plus two backends: the Neo4j bolt driver used in production and
//! an in-memory store used by tests. All operations are idempotent upserts
//! keyed by stable entity identifiers, so repeated or resumed runs converge
//! to the same graph.

mod memory;
mod neo4j;
mod traits;

pub use memory::MemoryGraph;
pub use neo4j::Neo4jGraph;
pub use traits::GraphStore;

use thiserror::Error;

/// Errors that can occur during graph store operations
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Graph database error: {0}")]
    Database(#[from] neo4rs::Error),

    #[error("Failed to connect to graph database at {uri}: {source}")]
    Connect { uri: String, source: neo4rs::Error },

    #[error("Invalid graph connection settings: {0}")]
    Settings(String),
}

/// Result type for graph store operations
pub type GraphResult<T> = Result<T, GraphError>;
