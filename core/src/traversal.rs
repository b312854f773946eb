use std::sync::atomic::{AtomicBool, Ordering};

use tracing::trace;

use crate::error::SearchError;
use crate::graph::{CompactGraph, NodeCatalog, NodeId};
use crate::path::Path;
use crate::visited::VisitedSet;

/// Upper bound on nodes in a reconstructed path. Real graphs of this kind
/// have diameters far below this.
pub const MAX_PATH_NODES: usize = 60;

/// Parent pointers produced by a successful BFS.
///
/// Only entries for nodes reached during the search are meaningful. The source
/// is its own parent.
#[derive(Debug, Clone)]
pub struct ParentMap {
    source: NodeId,
    dest: NodeId,
    parents: Vec<NodeId>,
    levels: u32,
}

impl ParentMap {
    /// Wrap a raw parent array, e.g. one produced outside [`search`].
    pub fn from_parents(source: NodeId, dest: NodeId, parents: Vec<NodeId>) -> Self {
        Self {
            source,
            dest,
            parents,
            levels: 0,
        }
    }

    pub fn source(&self) -> NodeId {
        self.source
    }

    pub fn dest(&self) -> NodeId {
        self.dest
    }

    #[inline]
    pub fn parent(&self, node: NodeId) -> NodeId {
        self.parents[node as usize]
    }

    /// Frontier levels fully expanded before `dest` was matched.
    pub fn levels(&self) -> u32 {
        self.levels
    }
}

/// Knobs for a single search.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchOptions<'a> {
    /// Checked once per frontier level; when set the search stops with
    /// [`SearchError::Cancelled`].
    pub cancel: Option<&'a AtomicBool>,
}

/// Level-synchronous BFS from `source` until `dest` is seen.
///
/// The destination test runs on every scanned neighbor, visited or not, so the
/// search stops mid-level as soon as `dest` shows up. `source == dest` is not
/// special-cased: it only matches through a self-loop, otherwise the search
/// runs out and reports `NotFound`.
///
/// Each finished level is sorted by node id before expansion so reads of the
/// adjacency arrays move forward through memory. Two frontier buffers sized to
/// the graph order are allocated once and swapped between levels.
pub fn search(
    graph: &CompactGraph,
    source: NodeId,
    dest: NodeId,
    options: SearchOptions<'_>,
) -> Result<ParentMap, SearchError> {
    let order = graph.order();

    let mut visited = VisitedSet::new(order);
    let mut parents: Vec<NodeId> = vec![0; order];
    let mut current: Vec<NodeId> = Vec::with_capacity(order);
    let mut next: Vec<NodeId> = Vec::with_capacity(order);

    visited.add(source);
    parents[source as usize] = source;
    current.push(source);

    let mut levels = 0u32;
    while !current.is_empty() {
        if options
            .cancel
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
        {
            return Err(SearchError::Cancelled { levels });
        }

        for &node in &current {
            for &neighbor in graph.neighbors(node) {
                if visited.insert(neighbor) {
                    parents[neighbor as usize] = node;
                    next.push(neighbor);
                }
                if neighbor == dest {
                    return Ok(ParentMap {
                        source,
                        dest,
                        parents,
                        levels,
                    });
                }
            }
        }

        levels += 1;
        trace!(level = levels, frontier = next.len(), "frontier expanded");

        next.sort_unstable();
        current.clear();
        std::mem::swap(&mut current, &mut next);
    }

    Err(SearchError::NotFound {
        from: source,
        to: dest,
    })
}

/// Walk parent pointers from `dest` back to `source`.
///
/// The resulting path is destination first. Gives up with
/// [`SearchError::PathTooLong`] once [`MAX_PATH_NODES`] are collected without
/// reaching the source.
pub fn reconstruct_path(catalog: &NodeCatalog, parents: &ParentMap) -> Result<Path, SearchError> {
    let (source, dest) = (parents.source, parents.dest);

    let mut nodes = Vec::with_capacity(10);
    nodes.push(catalog[dest].clone());

    let mut next = parents.parent(dest);
    while next != source && nodes.len() < MAX_PATH_NODES {
        nodes.push(catalog[next].clone());
        next = parents.parent(next);
    }

    if nodes.len() >= MAX_PATH_NODES {
        return Err(SearchError::PathTooLong {
            partial: Path::new(nodes),
        });
    }

    nodes.push(catalog[source].clone());
    Ok(Path::new(nodes))
}

/// Shortest path between two nodes, destination first.
pub fn find_path(
    graph: &CompactGraph,
    catalog: &NodeCatalog,
    source: NodeId,
    dest: NodeId,
) -> Result<Path, SearchError> {
    let parents = search(graph, source, dest, SearchOptions::default())?;
    reconstruct_path(catalog, &parents)
}

/// [`find_path`] that aborts between levels once `cancel` is set.
pub fn find_path_cancellable(
    graph: &CompactGraph,
    catalog: &NodeCatalog,
    source: NodeId,
    dest: NodeId,
    cancel: &AtomicBool,
) -> Result<Path, SearchError> {
    let options = SearchOptions {
        cancel: Some(cancel),
    };
    let parents = search(graph, source, dest, options)?;
    reconstruct_path(catalog, &parents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphBuilder, NodeInfo};

    /// Actor A - M1 - Actor B - M2 - Actor C
    fn toy() -> (CompactGraph, NodeCatalog) {
        let graph = CompactGraph::from_parts(
            vec![1, 0, 2, 1, 3, 2, 4, 3],
            vec![0, 1, 3, 5, 7, 8],
        )
        .unwrap();
        let catalog = NodeCatalog::new(vec![
            NodeInfo::person(0, "Actor A"),
            NodeInfo::work(1, "Movie M1"),
            NodeInfo::person(2, "Actor B"),
            NodeInfo::work(3, "Movie M2"),
            NodeInfo::person(4, "Actor C"),
        ]);
        (graph, catalog)
    }

    /// Alternating person/work chain of `n` nodes; even ids are people.
    fn make_chain(n: u32) -> (CompactGraph, NodeCatalog) {
        let mut b = GraphBuilder::new(n as usize);
        b.load_edges((0..n - 1).map(|i| (i, i + 1)));
        (b.build(), alternating_catalog(n))
    }

    fn alternating_catalog(n: u32) -> NodeCatalog {
        NodeCatalog::new(
            (0..n)
                .map(|i| {
                    if i % 2 == 0 {
                        NodeInfo::person(i, format!("P{i}"))
                    } else {
                        NodeInfo::work(i, format!("W{i}"))
                    }
                })
                .collect(),
        )
    }

    fn ids(path: &Path) -> Vec<NodeId> {
        path.iter().map(|n| n.node).collect()
    }

    #[test]
    fn test_toy_graph_scenario() {
        let (g, c) = toy();
        let path = find_path(&g, &c, 0, 4).unwrap();
        assert_eq!(ids(&path), vec![4, 3, 2, 1, 0]);
        assert_eq!(path[0], c[4]);
        assert_eq!(path[4], c[0]);
        assert_eq!(path.degrees(), 2);
    }

    #[test]
    fn test_toy_graph_reverse_direction() {
        let (g, c) = toy();
        let path = find_path(&g, &c, 4, 0).unwrap();
        assert_eq!(ids(&path), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_one_shared_work() {
        let (g, c) = toy();
        let path = find_path(&g, &c, 0, 2).unwrap();
        assert_eq!(ids(&path), vec![2, 1, 0]);
        assert_eq!(path.degrees(), 1);
    }

    #[test]
    fn test_adjacent_nodes() {
        let (g, c) = toy();
        let path = find_path(&g, &c, 2, 3).unwrap();
        assert_eq!(ids(&path), vec![3, 2]);
        assert_eq!(path.hops(), 1);
    }

    #[test]
    fn test_disjoint_components_not_found() {
        let mut b = GraphBuilder::new(6);
        b.load_edges([(0, 1), (1, 2), (3, 4), (4, 5)]);
        let g = b.build();
        let c = alternating_catalog(6);
        let err = find_path(&g, &c, 0, 5).unwrap_err();
        assert_eq!(err, SearchError::NotFound { from: 0, to: 5 });
    }

    #[test]
    fn test_isolated_source_not_found() {
        let g = GraphBuilder::new(3).build();
        let c = alternating_catalog(3);
        assert!(matches!(
            find_path(&g, &c, 0, 2),
            Err(SearchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_self_query_without_loop_not_found() {
        let (g, c) = toy();
        let err = find_path(&g, &c, 2, 2).unwrap_err();
        assert_eq!(err, SearchError::NotFound { from: 2, to: 2 });
    }

    #[test]
    fn test_self_query_with_loop() {
        let mut b = GraphBuilder::new(2);
        b.add_edge(0, 1);
        b.add_edge(0, 0);
        let g = b.build();
        let c = alternating_catalog(2);
        let path = find_path(&g, &c, 0, 0).unwrap();
        // One self-loop hop: the node appears at both ends.
        assert_eq!(ids(&path), vec![0, 0]);
        assert_eq!(path.degrees(), 0);
    }

    #[test]
    fn test_long_chain_shortest() {
        let (g, c) = make_chain(21);
        let path = find_path(&g, &c, 0, 20).unwrap();
        assert_eq!(path.len(), 21);
        assert_eq!(path.degrees(), 10);
        assert_eq!(path[0].node, 20);
        assert_eq!(path[20].node, 0);
    }

    #[test]
    fn test_picks_shortcut_over_long_way() {
        // Ring 0-1-2-3-4-5-6-7-0 plus nothing else: 0 to 6 is two hops the short way.
        let mut b = GraphBuilder::new(8);
        b.load_edges((0..8).map(|i| (i, (i + 1) % 8)));
        let g = b.build();
        let c = alternating_catalog(8);
        let path = find_path(&g, &c, 0, 6).unwrap();
        assert_eq!(ids(&path), vec![6, 7, 0]);
    }

    #[test]
    fn test_path_alternates_kinds() {
        // Two equally short routes from person 0 to person 4.
        let mut b = GraphBuilder::new(8);
        b.load_edges([(0, 1), (1, 2), (2, 3), (3, 4), (0, 5), (5, 6), (6, 7), (7, 4)]);
        let g = b.build();
        let c = alternating_catalog(8);
        let path = find_path(&g, &c, 0, 4).unwrap();
        assert_eq!(path.len(), 5);
        for pair in path.windows(2) {
            assert_ne!(pair[0].is_person, pair[1].is_person);
        }
    }

    #[test]
    fn test_found_at_first_level() {
        // Triangle 0-1-2: dest 2 is matched while scanning the source.
        let mut b = GraphBuilder::new(3);
        b.load_edges([(0, 1), (1, 2), (2, 0)]);
        let g = b.build();
        let parents = search(&g, 1, 2, SearchOptions::default()).unwrap();
        assert_eq!(parents.parent(2), 1);
        assert_eq!(parents.levels(), 0);
    }

    #[test]
    fn test_levels_reported() {
        let (g, _) = make_chain(7);
        let parents = search(&g, 0, 6, SearchOptions::default()).unwrap();
        assert_eq!(parents.levels(), 5);
        assert_eq!(parents.source(), 0);
        assert_eq!(parents.dest(), 6);
    }

    #[test]
    fn test_path_too_long_on_cyclic_parents() {
        let c = alternating_catalog(4);
        // 3 -> 2 -> 1 -> 2 -> 1 ... never reaches source 0.
        let parents = ParentMap::from_parents(0, 3, vec![0, 2, 1, 2]);
        match reconstruct_path(&c, &parents) {
            Err(SearchError::PathTooLong { partial }) => {
                assert_eq!(partial.len(), MAX_PATH_NODES);
                assert_eq!(partial[0].node, 3);
            }
            other => panic!("expected PathTooLong, got {other:?}"),
        }
    }

    #[test]
    fn test_path_at_bound_is_accepted() {
        let (g, c) = make_chain(MAX_PATH_NODES as u32);
        let path = find_path(&g, &c, 0, MAX_PATH_NODES as u32 - 1).unwrap();
        assert_eq!(path.len(), MAX_PATH_NODES);
    }

    #[test]
    fn test_path_over_bound_is_rejected() {
        let (g, c) = make_chain(MAX_PATH_NODES as u32 + 1);
        let err = find_path(&g, &c, 0, MAX_PATH_NODES as u32).unwrap_err();
        assert!(matches!(err, SearchError::PathTooLong { .. }));
    }

    #[test]
    fn test_cancelled_before_first_level() {
        let (g, c) = make_chain(10);
        let cancel = AtomicBool::new(true);
        let err = find_path_cancellable(&g, &c, 0, 9, &cancel).unwrap_err();
        assert_eq!(err, SearchError::Cancelled { levels: 0 });
    }

    #[test]
    fn test_not_cancelled_runs_to_completion() {
        let (g, c) = make_chain(10);
        let cancel = AtomicBool::new(false);
        let path = find_path_cancellable(&g, &c, 0, 9, &cancel).unwrap();
        assert_eq!(path.len(), 10);
    }

    #[test]
    fn test_cancelled_while_running() {
        const N: u32 = 2_000_000;
        let mut b = GraphBuilder::with_capacity(N as usize, N as usize - 1);
        b.load_edges((0..N - 1).map(|i| (i, i + 1)));
        let g = b.build();
        let cancel = AtomicBool::new(false);
        let started = std::sync::Barrier::new(2);

        let result = std::thread::scope(|scope| {
            let handle = scope.spawn(|| {
                started.wait();
                let options = SearchOptions {
                    cancel: Some(&cancel),
                };
                search(&g, 0, N - 1, options)
            });
            started.wait();
            std::thread::sleep(std::time::Duration::from_millis(5));
            cancel.store(true, Ordering::Relaxed);
            handle.join().unwrap()
        });

        match result {
            Ok(parents) => assert_eq!(parents.levels(), N - 2),
            Err(SearchError::Cancelled { levels }) => {
                assert!(levels > 0 && levels < N - 1, "levels = {levels}")
            }
            Err(other) => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_star_of_works() {
        // Person 0 in works 1..=5, each work has one extra person 6..=10.
        let mut b = GraphBuilder::new(11);
        for w in 1..=5 {
            b.add_edge(0, w);
            b.add_edge(w, w + 5);
        }
        let g = b.build();
        let c = NodeCatalog::new(
            (0..11)
                .map(|i| {
                    if (1..=5).contains(&i) {
                        NodeInfo::work(i, format!("W{i}"))
                    } else {
                        NodeInfo::person(i, format!("P{i}"))
                    }
                })
                .collect(),
        );
        let path = find_path(&g, &c, 8, 10).unwrap();
        assert_eq!(ids(&path), vec![10, 5, 0, 3, 8]);
        assert_eq!(path.degrees(), 2);
    }
}
