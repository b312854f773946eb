use std::fmt::Write;
use std::ops::Deref;

use crate::graph::NodeInfo;

/// A connecting chain, destination first: `nodes[0]` is the search target and
/// the last entry is the search source. Kinds alternate person/work.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path {
    nodes: Vec<NodeInfo>,
}

impl Path {
    pub fn new(nodes: Vec<NodeInfo>) -> Self {
        Self { nodes }
    }

    /// Number of shared-work hops between the two ends: `(len - 1) / 2`.
    pub fn degrees(&self) -> usize {
        self.nodes.len().saturating_sub(1) / 2
    }

    /// Edge count of the chain.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn first(&self) -> Option<&NodeInfo> {
        self.nodes.first()
    }

    pub fn last(&self) -> Option<&NodeInfo> {
        self.nodes.last()
    }

    /// Render the chain as a sentence, reading from index 0 onwards.
    ///
    /// `A and C are separated by 2 degrees. A was in "M1" with B, who was in "M2" with C`
    pub fn prose(&self) -> String {
        let (Some(first), Some(last)) = (self.nodes.first(), self.nodes.last()) else {
            return String::new();
        };

        let mut out = String::new();
        let _ = write!(
            out,
            "{} and {} are separated by {} degrees.",
            first.name,
            last.name,
            self.degrees()
        );

        let mut links = self.nodes[1..].chunks_exact(2);
        if let Some(link) = links.next() {
            let _ = write!(
                out,
                " {} was in \"{}\" with {}",
                first.name, link[0].name, link[1].name
            );
        }
        for link in links {
            let _ = write!(out, ", who was in \"{}\" with {}", link[0].name, link[1].name);
        }
        out
    }
}

impl Deref for Path {
    type Target = [NodeInfo];

    fn deref(&self) -> &[NodeInfo] {
        &self.nodes
    }
}

impl From<Vec<NodeInfo>> for Path {
    fn from(nodes: Vec<NodeInfo>) -> Self {
        Self::new(nodes)
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a NodeInfo;
    type IntoIter = std::slice::Iter<'a, NodeInfo>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}
