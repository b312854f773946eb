use crate::graph::NodeId;

const WORD_BITS: u32 = 5;
const WORD_MASK: u32 = (1 << WORD_BITS) - 1;

/// Bit-vector of visited nodes, 32 nodes per word.
///
/// Write-once per search: there is no removal. Node ids must be below the
/// size given to [`VisitedSet::new`].
#[derive(Debug, Clone)]
pub struct VisitedSet {
    words: Vec<u32>,
}

impl VisitedSet {
    pub fn new(size: usize) -> Self {
        Self {
            words: vec![0; size.div_ceil(32)],
        }
    }

    #[inline]
    fn offset(node: NodeId) -> (usize, u32) {
        ((node >> WORD_BITS) as usize, 1 << (node & WORD_MASK))
    }

    #[inline]
    pub fn add(&mut self, node: NodeId) {
        let (word, bit) = Self::offset(node);
        self.words[word] |= bit;
    }

    /// Mark `node`, returning whether it was newly added.
    #[inline]
    pub fn insert(&mut self, node: NodeId) -> bool {
        let (word, bit) = Self::offset(node);
        let fresh = self.words[word] & bit == 0;
        self.words[word] |= bit;
        fresh
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        let (word, bit) = Self::offset(node);
        self.words[word] & bit != 0
    }

    /// Number of backing words.
    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }
}
