use rand::Rng;

use crate::graph::{NodeCatalog, NodeId};

/// Draws person nodes uniformly by rejection over the whole id range.
///
/// Probing the flat catalog is cheaper than sampling the name map. The catalog
/// must contain at least one person or [`RandomSampler::person`] never returns.
#[derive(Debug, Clone, Copy)]
pub struct RandomSampler<'a> {
    catalog: &'a NodeCatalog,
}

impl<'a> RandomSampler<'a> {
    pub fn new(catalog: &'a NodeCatalog) -> Self {
        Self { catalog }
    }

    pub fn person<R: Rng + ?Sized>(&self, rng: &mut R) -> NodeId {
        let len = self.catalog.len();
        loop {
            let candidate = rng.gen_range(0..len) as NodeId;
            if self.catalog[candidate].is_person {
                return candidate;
            }
        }
    }

    /// A pair of independent draws.
    pub fn person_pair<R: Rng + ?Sized>(&self, rng: &mut R) -> (NodeId, NodeId) {
        (self.person(rng), self.person(rng))
    }
}
