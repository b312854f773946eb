use crate::graph::NodeId;
use crate::path::Path;

/// Outcome of a search that did not produce a path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no path from node {from} to node {to}")]
    NotFound { from: NodeId, to: NodeId },

    /// The parent walk exceeded [`MAX_PATH_NODES`](crate::MAX_PATH_NODES).
    /// Only a corrupted parent map can get here.
    #[error("path impossibly long: gave up after {} nodes", .partial.len())]
    PathTooLong { partial: Path },

    #[error("search cancelled after {levels} frontier levels")]
    Cancelled { levels: u32 },
}

/// Errors raised while assembling or querying a [`GraphEngine`](crate::GraphEngine).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("invalid offsets: {0}")]
    InvalidOffsets(String),

    #[error("neighbor {node} out of range for graph of order {order}")]
    NeighborOutOfRange { node: NodeId, order: usize },

    #[error("node catalog has {catalog} entries, graph has {order} nodes")]
    CatalogMismatch { catalog: usize, order: usize },

    #[error("node catalog entry {index} carries node id {node}")]
    NodeIdMismatch { index: usize, node: NodeId },

    #[error("name index entry '{name}' points at node {node}, outside the catalog")]
    NameOutOfRange { name: String, node: NodeId },

    #[error("name index is empty; nothing to match against")]
    EmptyNameIndex,

    #[error(transparent)]
    Search(#[from] SearchError),
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
