use std::collections::HashMap;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, Result};
use crate::graph::{NodeCatalog, NodeId};

/// Lower-cased display name → person node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NameIndex {
    people: HashMap<String, NodeId>,
}

/// Case-fold a display name into its index key.
pub fn normalize(name: &str) -> String {
    name.to_lowercase()
}

impl NameIndex {
    /// Adopt a ready-made mapping. Keys are expected to be normalized already.
    pub fn from_map(people: HashMap<String, NodeId>) -> Self {
        Self { people }
    }

    /// Index every person in node-id order. When two people normalize to the
    /// same key the higher node id wins.
    pub fn from_catalog(catalog: &NodeCatalog) -> Self {
        let mut people = HashMap::with_capacity(catalog.person_count());
        for info in catalog.iter().filter(|n| n.is_person) {
            people.insert(normalize(&info.name), info.node);
        }
        Self { people }
    }

    /// Exact lookup after normalization.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        self.people.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Ensure every entry names a node inside a catalog of `len` nodes.
    pub(crate) fn check_bounds(&self, len: usize) -> Result<()> {
        match self.people.iter().find(|(_, &node)| node as usize >= len) {
            Some((name, &node)) => Err(EngineError::NameOutOfRange {
                name: name.clone(),
                node,
            }),
            None => Ok(()),
        }
    }
}

/// How a query was matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub node: NodeId,
    /// Edit distance between the normalized query and the matched key.
    pub distance: usize,
}

impl Resolution {
    pub fn is_exact(&self) -> bool {
        self.distance == 0
    }
}

/// Exact name lookup with an edit-distance fallback.
#[derive(Debug, Clone, Copy)]
pub struct NameResolver<'a> {
    index: &'a NameIndex,
}

impl<'a> NameResolver<'a> {
    pub fn new(index: &'a NameIndex) -> Self {
        Self { index }
    }

    pub fn resolve(&self, query: &str) -> Result<NodeId> {
        self.resolve_detailed(query).map(|r| r.node)
    }

    /// Exact hit first. Otherwise scan every key for the minimum Levenshtein
    /// distance; ties go to the smallest node id, then the smaller key.
    pub fn resolve_detailed(&self, query: &str) -> Result<Resolution> {
        let key = normalize(query);
        if let Some(&node) = self.index.people.get(&key) {
            return Ok(Resolution { node, distance: 0 });
        }

        let started = Instant::now();
        let query_chars: Vec<char> = key.chars().collect();
        let mut scratch = Vec::with_capacity(query_chars.len() + 1);

        let best = self
            .index
            .people
            .iter()
            .map(|(name, &node)| {
                let distance = edit_distance_with(name, &query_chars, &mut scratch);
                (distance, node, name.as_str())
            })
            .min()
            .ok_or(EngineError::EmptyNameIndex)?;

        let (distance, node, name) = best;
        debug!(
            query,
            matched = name,
            distance,
            elapsed_us = started.elapsed().as_micros() as u64,
            "name not found, using most similar"
        );
        Ok(Resolution { node, distance })
    }
}

/// Levenshtein distance over Unicode scalar values.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let b_chars: Vec<char> = b.chars().collect();
    edit_distance_with(a, &b_chars, &mut Vec::new())
}

/// Two-row DP. `prev` is reused across calls to keep the fuzzy scan from
/// allocating per key.
fn edit_distance_with(value: &str, needle: &[char], prev: &mut Vec<usize>) -> usize {
    let n = needle.len();
    prev.clear();
    prev.extend(0..=n);

    for (i, c) in value.chars().enumerate() {
        let mut diag = prev[0];
        prev[0] = i + 1;
        for j in 1..=n {
            let cost = usize::from(c != needle[j - 1]);
            let substitution = diag + cost;
            let deletion = prev[j] + 1;
            let insertion = prev[j - 1] + 1;
            diag = prev[j];
            prev[j] = substitution.min(deletion).min(insertion);
        }
    }
    prev[n]
}
