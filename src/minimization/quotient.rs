use std::ops::{Index, IndexMut, Range};

use crate::{
    graph::{IndexType, IsEdge},
    math::Set,
    Color, Graph, Void,
};

use super::{
    partition::BlockId,
    registry::{LabelId, StateRegistry},
    result::{Block, MinimizationResult},
};

/// Stores one value for every block of a [`MinimizationResult`]. Lookups are plain array
/// accesses. Block ids are only meaningful for the result they come from, so a map should not
/// be used with the blocks of any other result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockMap<V> {
    values: Vec<V>,
}

impl<V> BlockMap<V> {
    /// Computes the value of every block of `result` by applying `f` to it.
    pub fn new<N, L, F>(result: &MinimizationResult<N, L>, f: F) -> Self
    where
        N: IndexType,
        L: Color,
        F: FnMut(Block<'_, N, L>) -> V,
    {
        Self {
            values: result.blocks().map(f).collect(),
        }
    }

    /// Creates a map in which every block of `result` has the default value.
    pub fn with_default<N: IndexType, L: Color>(result: &MinimizationResult<N, L>) -> Self
    where
        V: Default,
    {
        Self {
            values: std::iter::repeat_with(V::default)
                .take(result.size())
                .collect(),
        }
    }

    /// Returns the value of `block`, if the block exists.
    pub fn get(&self, block: BlockId) -> Option<&V> {
        self.values.get(block)
    }

    /// Returns a mutable reference to the value of `block`, if the block exists.
    pub fn get_mut(&mut self, block: BlockId) -> Option<&mut V> {
        self.values.get_mut(block)
    }

    /// Stores `value` for `block` and returns the value that was stored before.
    ///
    /// # Panics
    ///
    /// Panics if `block` is not a block of the result the map was created for.
    pub fn put(&mut self, block: BlockId, value: V) -> V {
        std::mem::replace(&mut self.values[block], value)
    }

    /// The number of blocks, which is the same as the size of the underlying result.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` iff there are no blocks.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over all blocks together with their values, ordered by block id.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &V)> + '_ {
        self.values.iter().enumerate()
    }
}

impl<V> Index<BlockId> for BlockMap<V> {
    type Output = V;

    fn index(&self, index: BlockId) -> &Self::Output {
        &self.values[index]
    }
}

impl<V> IndexMut<BlockId> for BlockMap<V> {
    fn index_mut(&mut self, index: BlockId) -> &mut Self::Output {
        &mut self.values[index]
    }
}

/// An edge of a [`BlockAutomaton`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEdge<'a, L> {
    source: BlockId,
    label: &'a L,
    target: BlockId,
}

impl<'a, L> BlockEdge<'a, L> {
    /// Gives a reference to the label of the edge.
    pub fn label_ref(&self) -> &'a L {
        self.label
    }
}

impl<'a, L: Clone> IsEdge<BlockId, L> for BlockEdge<'a, L> {
    fn source(&self) -> BlockId {
        self.source
    }

    fn target(&self) -> BlockId {
        self.target
    }

    fn label(&self) -> L {
        self.label.clone()
    }
}

/// Iterator over the edges leaving a block of a [`BlockAutomaton`].
#[derive(Debug, Clone)]
pub struct BlockEdgesFrom<'a, N, L> {
    source: BlockId,
    registry: &'a StateRegistry<N, L>,
    it: std::slice::Iter<'a, (LabelId, BlockId)>,
}

impl<'a, N: IndexType, L: Color> Iterator for BlockEdgesFrom<'a, N, L> {
    type Item = BlockEdge<'a, L>;

    fn next(&mut self) -> Option<Self::Item> {
        let &(label, target) = self.it.next()?;
        Some(BlockEdge {
            source: self.source,
            label: self.registry.label(label),
            target,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

/// The quotient of a minimized graph: every block becomes a node and for every edge leaving
/// the representative of a block there is an edge from that block to the block containing the
/// target. Since the partition is stable, it does not matter which member represents a block.
/// Edges that would only differ in the member they originate from are merged, so for every pair
/// of label and target block there is at most one edge.
///
/// The block automaton is a [`Graph`] itself, with block ids as its nodes. It can thus be
/// minimized again or collected into an [`crate::graph::EdgeLists`].
///
/// ```
/// use automata_minimizer::prelude::*;
///
/// let ts = GraphBuilder::default()
///     .with_state_colors([true, true, false])
///     .with_edges([(0, 'a', 1), (1, 'a', 0), (0, 'b', 2), (1, 'b', 2)])
///     .into_edge_lists()
///     .unwrap();
/// let result = ts.minimize();
/// let quotient = result.quotient(|q| ts.state_color(q).unwrap());
///
/// let accepting = result.block_of(0).unwrap();
/// assert_eq!(quotient.state_color(accepting), Some(true));
/// assert_eq!(quotient.edges_from(accepting).unwrap().count(), 2);
/// assert_eq!(quotient.collect_edge_lists().size(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BlockAutomaton<'a, N, L, Q = Void> {
    result: &'a MinimizationResult<N, L>,
    colors: BlockMap<Q>,
    edges: BlockMap<Vec<(LabelId, BlockId)>>,
}

impl<'a, N: IndexType, L: Color, Q: Color> BlockAutomaton<'a, N, L, Q> {
    pub(crate) fn new<F>(result: &'a MinimizationResult<N, L>, mut color: F) -> Self
    where
        F: FnMut(N) -> Q,
    {
        let colors = BlockMap::new(result, |block| color(block.representative()));
        let edges = BlockMap::new(result, |block| {
            let mut seen = Set::default();
            result
                .registry()
                .graph()
                .outgoing(result.representative_state(block.id()))
                .map(|edge| (edge.label, result.block_of_state(edge.target)))
                .filter(|pair| seen.insert(*pair))
                .collect()
        });
        Self {
            result,
            colors,
            edges,
        }
    }

    /// Returns the minimization result this is the quotient of.
    pub fn result(&self) -> &'a MinimizationResult<N, L> {
        self.result
    }

    /// Gives the colors of all blocks.
    pub fn colors(&self) -> &BlockMap<Q> {
        &self.colors
    }

    /// Returns the block reached from `block` with an edge labeled `label`, if there is one.
    pub fn successor(&self, block: BlockId, label: &L) -> Option<BlockId> {
        self.edges_from(block)?
            .find(|edge| edge.label_ref() == label)
            .map(|edge| edge.target())
    }
}

impl<'a, N: IndexType, L: Color, Q: Color> Graph for BlockAutomaton<'a, N, L, Q> {
    type Node = BlockId;
    type Label = L;
    type StateColor = Q;
    type EdgeRef<'this> = BlockEdge<'this, L> where Self: 'this;
    type EdgesFromIter<'this> = BlockEdgesFrom<'this, N, L> where Self: 'this;
    type NodesIter<'this> = Range<BlockId> where Self: 'this;

    fn nodes(&self) -> Self::NodesIter<'_> {
        0..self.result.size()
    }

    fn edges_from(&self, node: BlockId) -> Option<Self::EdgesFromIter<'_>> {
        self.edges.get(node).map(|edges| BlockEdgesFrom {
            source: node,
            registry: self.result.registry(),
            it: edges.iter(),
        })
    }

    fn state_color(&self, node: BlockId) -> Option<Q> {
        self.colors.get(node).cloned()
    }

    fn size(&self) -> usize {
        self.result.size()
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    #[test_log::test]
    fn quotient_of_wiki_dfa() {
        let dfa = crate::tests::wiki_dfa();
        let result = dfa.ts().minimize();
        let quotient = result.quotient(|q| dfa.ts().state_color(q).unwrap());
        assert_eq!(quotient.size(), 3);

        let initial = result.block_of(0).unwrap();
        let accepting = result.block_of(2).unwrap();
        let sink = result.block_of(5).unwrap();
        assert_eq!(quotient.successor(initial, &'a'), Some(initial));
        assert_eq!(quotient.successor(initial, &'b'), Some(accepting));
        assert_eq!(quotient.successor(accepting, &'a'), Some(accepting));
        assert_eq!(quotient.successor(accepting, &'b'), Some(sink));
        assert_eq!(quotient.state_color(accepting), Some(true));
        assert_eq!(quotient.state_color(sink), Some(false));
        assert_eq!(quotient.state_color(3), None);
        assert!(quotient.edges_from(3).is_none());

        for block in quotient.nodes() {
            let labels = quotient
                .edges_from(block)
                .unwrap()
                .map(|edge| edge.label())
                .sorted()
                .collect_vec();
            assert_eq!(labels, vec!['a', 'b']);
        }
    }

    #[test]
    fn block_automaton_keeps_partial_edges() {
        let ts = GraphBuilder::without_state_colors()
            .with_edges([(0, 'a', 1), (0, 'a', 2), (1, 'b', 1), (2, 'b', 2)])
            .into_edge_lists()
            .unwrap();
        let result = ts.minimize();
        assert!(result.same_block(1, 2));
        let quotient = result.block_automaton();
        let start = result.block_of(0).unwrap();
        // both a-edges of 0 lead to the same block and are merged
        assert_eq!(quotient.edges_from(start).unwrap().count(), 1);
        assert_eq!(quotient.successor(start, &'b'), None);
        assert_eq!(quotient.state_color(start), Some(Void));
        assert_eq!(quotient.result().size(), 2);
    }

    #[test]
    fn block_map_access() {
        let dfa = crate::tests::wiki_dfa();
        let result = dfa.ts().minimize();

        let mut sizes = BlockMap::new(&result, |block| block.size());
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes.iter().map(|(_, size)| size).sum::<usize>(), 6);
        let sink = result.block_of(5).unwrap();
        assert_eq!(sizes[sink], 1);
        assert_eq!(sizes.put(sink, 10), 1);
        sizes[sink] += 1;
        assert_eq!(sizes.get(sink), Some(&11));
        assert_eq!(sizes.get(3), None);

        let mut counters: BlockMap<u32> = BlockMap::with_default(&result);
        *counters.get_mut(0).unwrap() += 2;
        assert_eq!(counters.iter().collect_vec(), vec![(0, &2), (1, &0), (2, &0)]);
        assert!(!counters.is_empty());
    }
}
