use serde::{Deserialize, Serialize};

use crate::engine::GraphEngine;
use crate::error::Result;
use crate::graph::{CompactGraph, NodeCatalog, NodeId, NodeInfo};
use crate::names::NameIndex;

/// CSR arrays as they appear in the data file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphArrays {
    #[serde(rename = "list")]
    pub neighbors: Vec<NodeId>,
    #[serde(rename = "span")]
    pub offsets: Vec<u64>,
}

/// The persisted dataset record: adjacency, per-node metadata and the
/// person-name index. Parsing and file access belong to the caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub graph: GraphArrays,
    #[serde(rename = "node_data")]
    pub nodes: Vec<NodeInfo>,
    #[serde(rename = "people")]
    pub names: NameIndex,
}

impl Snapshot {
    /// Validate and freeze into a query engine.
    pub fn into_engine(self) -> Result<GraphEngine> {
        let graph = CompactGraph::from_parts(self.graph.neighbors, self.graph.offsets)?;
        GraphEngine::load(graph, NodeCatalog::new(self.nodes), self.names)
    }

    /// Capture an engine's structures for writing back out.
    pub fn from_engine(engine: &GraphEngine) -> Self {
        let (neighbors, offsets) = engine.graph().as_parts();
        Self {
            graph: GraphArrays {
                neighbors: neighbors.to_vec(),
                offsets: offsets.to_vec(),
            },
            nodes: engine.catalog().iter().cloned().collect(),
            names: engine.names().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    const TOY: &str = r#"{
        "graph": { "list": [1, 0, 2, 1, 3, 2, 4, 3], "span": [0, 1, 3, 5, 7, 8] },
        "node_data": [
            { "Name": "Actor A", "isPerson": true, "tmdb_id": 10, "node_id": 0 },
            { "Name": "Movie M1", "isPerson": false, "tmdb_id": 20, "node_id": 1 },
            { "Name": "Actor B", "isPerson": true, "tmdb_id": 11, "node_id": 2 },
            { "Name": "Movie M2", "isPerson": false, "tmdb_id": 21, "node_id": 3 },
            { "Name": "Actor C", "isPerson": true, "tmdb_id": 12, "node_id": 4 }
        ],
        "people": { "actor a": 0, "actor b": 2, "actor c": 4 }
    }"#;

    #[test]
    fn test_toy_snapshot_loads() {
        let snap: Snapshot = serde_json::from_str(TOY).unwrap();
        let engine = snap.into_engine().unwrap();
        assert_eq!(engine.graph().order(), 5);
        assert_eq!(engine.catalog()[1].external_id, 20);
        let path = engine.find_path(0, 4).unwrap();
        let ids: Vec<_> = path.iter().map(|n| n.node).collect();
        assert_eq!(ids, vec![4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_lowercase_name_field_accepted() {
        let info: NodeInfo = serde_json::from_str(
            r#"{ "name": "Movie M1", "isPerson": false, "tmdb_id": 20, "node_id": 1 }"#,
        )
        .unwrap();
        assert_eq!(info.name, "Movie M1");
    }

    #[test]
    fn test_misnumbered_node_data_rejected() {
        let mut snap: Snapshot = serde_json::from_str(TOY).unwrap();
        snap.nodes[1].node = 99;
        assert!(matches!(
            snap.into_engine(),
            Err(EngineError::NodeIdMismatch { index: 1, node: 99 })
        ));
    }

    #[test]
    fn test_bad_offsets_rejected() {
        let mut snap: Snapshot = serde_json::from_str(TOY).unwrap();
        snap.graph.offsets[5] = 9;
        assert!(matches!(
            snap.into_engine(),
            Err(EngineError::InvalidOffsets(_))
        ));
    }

    #[test]
    fn test_round_trip_through_engine() {
        let snap: Snapshot = serde_json::from_str(TOY).unwrap();
        let engine = snap.into_engine().unwrap();
        let out = serde_json::to_string(&Snapshot::from_engine(&engine)).unwrap();
        let again: Snapshot = serde_json::from_str(&out).unwrap();
        assert_eq!(again.graph.offsets, vec![0, 1, 3, 5, 7, 8]);
        assert_eq!(again.nodes[4].name, "Actor C");
        assert_eq!(again.names.get("actor b"), Some(2));
    }
}
