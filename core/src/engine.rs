use std::sync::atomic::AtomicBool;

use rand::Rng;

use crate::error::{EngineError, Result, SearchError};
use crate::graph::{CompactGraph, NodeCatalog, NodeId};
use crate::names::{NameIndex, NameResolver, Resolution};
use crate::path::Path;
use crate::sample::RandomSampler;
use crate::traversal;

/// Read-only bundle of graph, catalog and name index.
///
/// Nothing here mutates after [`GraphEngine::load`], so one engine can be shared
/// by reference across any number of threads. Each query allocates its own
/// search state.
#[derive(Debug, Clone)]
pub struct GraphEngine {
    graph: CompactGraph,
    catalog: NodeCatalog,
    names: NameIndex,
}

/// Size summary of a loaded engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineStats {
    pub nodes: usize,
    pub edges: usize,
    pub people: usize,
    pub works: usize,
    pub names: usize,
    pub memory_bytes: usize,
}

impl GraphEngine {
    /// Assemble an engine from already-parsed parts.
    pub fn load(graph: CompactGraph, catalog: NodeCatalog, names: NameIndex) -> Result<Self> {
        if catalog.len() != graph.order() {
            return Err(EngineError::CatalogMismatch {
                catalog: catalog.len(),
                order: graph.order(),
            });
        }
        if let Some((index, info)) = catalog
            .iter()
            .enumerate()
            .find(|(i, info)| info.node as usize != *i)
        {
            return Err(EngineError::NodeIdMismatch {
                index,
                node: info.node,
            });
        }
        names.check_bounds(catalog.len())?;
        Ok(Self {
            graph,
            catalog,
            names,
        })
    }

    /// Like [`GraphEngine::load`], deriving the name index from the catalog.
    pub fn from_catalog(graph: CompactGraph, catalog: NodeCatalog) -> Result<Self> {
        let names = NameIndex::from_catalog(&catalog);
        Self::load(graph, catalog, names)
    }

    pub fn graph(&self) -> &CompactGraph {
        &self.graph
    }

    pub fn catalog(&self) -> &NodeCatalog {
        &self.catalog
    }

    pub fn names(&self) -> &NameIndex {
        &self.names
    }

    /// Person node for a free-text name, falling back to the closest match.
    pub fn resolve(&self, query: &str) -> Result<NodeId> {
        NameResolver::new(&self.names).resolve(query)
    }

    pub fn resolve_detailed(&self, query: &str) -> Result<Resolution> {
        NameResolver::new(&self.names).resolve_detailed(query)
    }

    /// Shortest path, destination first.
    pub fn find_path(&self, source: NodeId, dest: NodeId) -> Result<Path, SearchError> {
        traversal::find_path(&self.graph, &self.catalog, source, dest)
    }

    pub fn find_path_cancellable(
        &self,
        source: NodeId,
        dest: NodeId,
        cancel: &AtomicBool,
    ) -> Result<Path, SearchError> {
        traversal::find_path_cancellable(&self.graph, &self.catalog, source, dest, cancel)
    }

    /// Resolve both names and search between them.
    pub fn find_path_by_name(&self, from: &str, to: &str) -> Result<Path> {
        let source = self.resolve(from)?;
        let dest = self.resolve(to)?;
        Ok(self.find_path(source, dest)?)
    }

    pub fn random_person<R: Rng + ?Sized>(&self, rng: &mut R) -> NodeId {
        RandomSampler::new(&self.catalog).person(rng)
    }

    /// Two independent person draws, for random search endpoints.
    pub fn random_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (NodeId, NodeId) {
        RandomSampler::new(&self.catalog).person_pair(rng)
    }

    pub fn degrees(path: &Path) -> usize {
        path.degrees()
    }

    pub fn prose(path: &Path) -> String {
        path.prose()
    }

    pub fn stats(&self) -> EngineStats {
        let people = self.catalog.person_count();
        EngineStats {
            nodes: self.graph.order(),
            edges: self.graph.edge_count(),
            people,
            works: self.catalog.len() - people,
            names: self.names.len(),
            memory_bytes: self.graph.memory_usage() + self.catalog.memory_usage(),
        }
    }
}
