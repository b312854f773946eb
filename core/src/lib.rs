//! degrees-core: degrees-of-separation engine over a bipartite people/works graph.
//!
//! Holds the graph as flat CSR arrays and answers shortest-path queries with a
//! level-synchronous BFS backed by a bit-vector visited set. Names resolve
//! exactly through a lower-cased index, with a Levenshtein fallback for typos.
//! No I/O happens here: callers parse the dataset and hand over the structures.

mod engine;
mod error;
mod graph;
mod names;
mod path;
mod sample;
mod snapshot;
mod traversal;
mod visited;

pub use engine::{EngineStats, GraphEngine};
pub use error::{EngineError, Result, SearchError};
pub use graph::{CompactGraph, GraphBuilder, NodeCatalog, NodeId, NodeInfo};
pub use names::{edit_distance, normalize, NameIndex, NameResolver, Resolution};
pub use path::Path;
pub use sample::RandomSampler;
pub use snapshot::{GraphArrays, Snapshot};
pub use traversal::{
    find_path, find_path_cancellable, reconstruct_path, search, ParentMap, SearchOptions,
    MAX_PATH_NODES,
};
pub use visited::VisitedSet;
