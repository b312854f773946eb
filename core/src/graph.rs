use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Dense node identifier shared by people and works. Range is `0..order`.
pub type NodeId = u32;

/// Metadata about a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    #[serde(rename = "Name", alias = "name")]
    pub name: String,
    #[serde(rename = "isPerson")]
    pub is_person: bool,
    /// External reference (TMDB id in the movie dataset). Opaque to the engine.
    #[serde(rename = "tmdb_id")]
    pub external_id: u32,
    #[serde(rename = "node_id")]
    pub node: NodeId,
}

impl NodeInfo {
    pub fn person(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_person: true,
            external_id: 0,
            node,
        }
    }

    pub fn work(node: NodeId, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_person: false,
            external_id: 0,
            node,
        }
    }
}

/// Immutable CSR adjacency.
///
/// `offsets[i]..offsets[i + 1]` is node `i`'s slice of `neighbors`. Every
/// undirected edge is stored twice, once in each endpoint's slice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompactGraph {
    neighbors: Vec<NodeId>,
    offsets: Vec<u64>,
}

impl CompactGraph {
    /// Adopt already-built arrays, checking the offset invariants.
    ///
    /// Symmetry of the adjacency is assumed, not verified.
    pub fn from_parts(neighbors: Vec<NodeId>, offsets: Vec<u64>) -> Result<Self> {
        let Some((&first, &last)) = offsets.first().zip(offsets.last()) else {
            return Err(EngineError::InvalidOffsets("offsets is empty".into()));
        };
        if first != 0 {
            return Err(EngineError::InvalidOffsets(format!(
                "offsets[0] is {first}, expected 0"
            )));
        }
        if last != neighbors.len() as u64 {
            return Err(EngineError::InvalidOffsets(format!(
                "last offset is {last}, neighbors has {} entries",
                neighbors.len()
            )));
        }
        if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
            return Err(EngineError::InvalidOffsets(format!(
                "offsets decrease at index {}",
                i + 1
            )));
        }

        let order = offsets.len() - 1;
        if let Some(&bad) = neighbors.iter().find(|&&n| n as usize >= order) {
            return Err(EngineError::NeighborOutOfRange { node: bad, order });
        }

        Ok(Self { neighbors, offsets })
    }

    /// Number of nodes.
    pub fn order(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// Neighbor slice of `node`, in construction order. Panics if out of range.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        let n = node as usize;
        let (start, end) = (self.offsets[n] as usize, self.offsets[n + 1] as usize);
        &self.neighbors[start..end]
    }

    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// Undirected edge count (each edge occupies two adjacency slots).
    pub fn edge_count(&self) -> usize {
        self.neighbors.len() / 2
    }

    /// Raw arrays, for serializing back out.
    pub fn as_parts(&self) -> (&[NodeId], &[u64]) {
        (&self.neighbors, &self.offsets)
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        self.neighbors.len() * size_of::<NodeId>() + self.offsets.len() * size_of::<u64>()
    }
}

/// Per-node metadata, indexed by node id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeCatalog {
    nodes: Vec<NodeInfo>,
}

impl NodeCatalog {
    pub fn new(nodes: Vec<NodeInfo>) -> Self {
        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, node: NodeId) -> Option<&NodeInfo> {
        self.nodes.get(node as usize)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeInfo> {
        self.nodes.iter()
    }

    pub fn person_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_person).count()
    }

    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        self.nodes
            .iter()
            .map(|n| size_of::<NodeInfo>() + n.name.capacity())
            .sum()
    }
}

impl Index<NodeId> for NodeCatalog {
    type Output = NodeInfo;

    fn index(&self, node: NodeId) -> &NodeInfo {
        &self.nodes[node as usize]
    }
}

impl From<Vec<NodeInfo>> for NodeCatalog {
    fn from(nodes: Vec<NodeInfo>) -> Self {
        Self::new(nodes)
    }
}

/// Accumulates undirected edges and freezes them into a [`CompactGraph`].
///
/// Adjacency order follows insertion order: for edge `(u, v)`, `v` is appended
/// to `u`'s list and `u` to `v`'s list.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    adjacency: Vec<Vec<NodeId>>,
    slots: usize,
}

impl GraphBuilder {
    pub fn new(order: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); order],
            slots: 0,
        }
    }

    /// Pre-allocate per-node lists for an expected edge count.
    pub fn with_capacity(order: usize, edge_count: usize) -> Self {
        let per_node = if order == 0 { 0 } else { edge_count * 2 / order };
        Self {
            adjacency: (0..order).map(|_| Vec::with_capacity(per_node)).collect(),
            slots: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.adjacency.len()
    }

    /// Add an undirected edge. Grows the node range if either endpoint is new.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) {
        let needed = a.max(b) as usize + 1;
        if needed > self.adjacency.len() {
            self.adjacency.resize_with(needed, Vec::new);
        }
        self.adjacency[a as usize].push(b);
        self.adjacency[b as usize].push(a);
        self.slots += 2;
    }

    /// Bulk load from an iterator of undirected `(a, b)` pairs.
    pub fn load_edges<I>(&mut self, edges: I)
    where
        I: IntoIterator<Item = (NodeId, NodeId)>,
    {
        for (a, b) in edges {
            self.add_edge(a, b);
        }
    }

    pub fn build(self) -> CompactGraph {
        let mut neighbors = Vec::with_capacity(self.slots);
        let mut offsets = Vec::with_capacity(self.adjacency.len() + 1);
        offsets.push(0u64);
        for list in self.adjacency {
            neighbors.extend_from_slice(&list);
            offsets.push(neighbors.len() as u64);
        }
        CompactGraph { neighbors, offsets }
    }
}
