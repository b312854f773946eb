use degrees_core::{EngineError, GraphBuilder, GraphEngine, NodeCatalog, NodeId, NodeInfo};
use rand::Rng;

/// Shape of a synthetic people/works graph.
#[derive(Debug, Clone, Copy)]
pub struct CastingModel {
    pub people: u32,
    pub works: u32,
    /// Mean cast size per work.
    pub cast: u32,
}

/// Bipartite preferential attachment.
///
/// Works get ids `0..works`, people `works..works + people`. Each work draws a
/// cast of `1..=2 * cast` people: half the slots come from the appearance list
/// (so prolific people keep getting cast), the rest uniformly, which keeps
/// newcomers entering the graph.
pub fn generate<R: Rng + ?Sized>(
    model: CastingModel,
    rng: &mut R,
) -> Result<GraphEngine, EngineError> {
    let CastingModel {
        people,
        works,
        cast,
    } = model;
    let order = (people + works) as usize;
    let expected_edges = works as usize * cast as usize;
    let mut builder = GraphBuilder::with_capacity(order, expected_edges);

    // One entry per appearance; sampling it is proportional to degree.
    let mut appearances: Vec<NodeId> = Vec::with_capacity(expected_edges);

    for work in 0..works {
        let size = rng.gen_range(1..=cast.max(1) * 2);
        for _ in 0..size {
            let person = if !appearances.is_empty() && rng.gen_bool(0.5) {
                appearances[rng.gen_range(0..appearances.len())]
            } else {
                works + rng.gen_range(0..people)
            };
            builder.add_edge(work, person);
            appearances.push(person);
        }
    }

    let catalog = NodeCatalog::new(
        (0..order as NodeId)
            .map(|id| {
                if id < works {
                    NodeInfo::work(id, format!("Work {id}"))
                } else {
                    NodeInfo::person(id, format!("Person {}", id - works))
                }
            })
            .collect(),
    );

    GraphEngine::from_catalog(builder.build(), catalog)
}
