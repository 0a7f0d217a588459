use std::fmt::Display;

use itertools::Itertools;

use crate::{graph::IndexType, math, Color, Void};

use super::{
    partition::{BlockId, Partition},
    quotient::BlockAutomaton,
    registry::{StateId, StateRegistry},
};

/// The outcome of a minimization: the coarsest stable partition of the nodes that took part,
/// together with everything that is needed to look up nodes and to build the quotient.
///
/// Blocks are identified by a [`BlockId`], ids range from `0` to `size() - 1`. They are only
/// meaningful for this particular result, a different run on the same graph may number the
/// blocks differently. Within a block the nodes are ordered by the position in which they were
/// registered, and the first of them is the representative of the block.
///
/// The result is immutable. It owns copies of the nodes and labels, so it does not borrow the
/// graph it was computed from.
#[derive(Debug, Clone)]
pub struct MinimizationResult<N, L> {
    registry: StateRegistry<N, L>,
    blocks: Vec<Vec<StateId>>,
    block_of: Vec<BlockId>,
}

impl<N: IndexType, L: Color> MinimizationResult<N, L> {
    pub(crate) fn new(registry: StateRegistry<N, L>, partition: Partition) -> Self {
        let (mut blocks, block_of) = partition.into_parts();
        for states in &mut blocks {
            states.sort_unstable();
        }
        Self {
            registry,
            blocks,
            block_of,
        }
    }

    pub(crate) fn registry(&self) -> &StateRegistry<N, L> {
        &self.registry
    }

    pub(crate) fn block_of_state(&self, state: StateId) -> BlockId {
        self.block_of[state]
    }

    pub(crate) fn representative_state(&self, block: BlockId) -> StateId {
        self.blocks[block][0]
    }

    /// Returns the number of blocks.
    pub fn size(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` iff there are no blocks, which happens precisely if no node took part.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Returns the number of nodes that were partitioned.
    pub fn num_states(&self) -> usize {
        self.registry.size()
    }

    /// Returns the id of the block containing `node`, or `None` if `node` was not part of the
    /// minimization.
    pub fn block_of(&self, node: N) -> Option<BlockId> {
        self.registry
            .state_of(&node)
            .map(|state| self.block_of[state])
    }

    /// Returns `true` iff `node` was part of the minimization.
    pub fn contains(&self, node: N) -> bool {
        self.registry.state_of(&node).is_some()
    }

    /// Returns `true` iff both nodes took part and ended up in the same block.
    pub fn same_block(&self, left: N, right: N) -> bool {
        match (self.block_of(left), self.block_of(right)) {
            (Some(l), Some(r)) => l == r,
            _ => false,
        }
    }

    /// Gives a view on the block with the given id.
    pub fn block(&self, id: BlockId) -> Option<Block<'_, N, L>> {
        (id < self.size()).then_some(Block { result: self, id })
    }

    /// Iterates over all blocks in order of their id.
    pub fn blocks(&self) -> impl Iterator<Item = Block<'_, N, L>> + '_ {
        (0..self.size()).map(move |id| Block { result: self, id })
    }

    /// Returns the representative node of the block with the given id.
    pub fn representative(&self, id: BlockId) -> Option<N> {
        self.block(id).map(|block| block.representative())
    }

    /// Converts the blocks into a [`math::Partition`] of nodes, which can be compared with other
    /// partitions regardless of how the blocks are numbered.
    pub fn partition(&self) -> math::Partition<N> {
        self.blocks().map(|block| block.states().collect_vec()).collect()
    }

    /// Returns the quotient of the minimized graph where all blocks are uncolored.
    pub fn block_automaton(&self) -> BlockAutomaton<'_, N, L, Void> {
        BlockAutomaton::new(self, |_| Void)
    }

    /// Returns the quotient of the minimized graph. Each block is colored by applying `color`
    /// to its representative.
    pub fn quotient<Q, F>(&self, color: F) -> BlockAutomaton<'_, N, L, Q>
    where
        Q: Color,
        F: FnMut(N) -> Q,
    {
        BlockAutomaton::new(self, color)
    }
}

impl<N: IndexType, L: Color> Display for MinimizationResult<N, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut builder = tabled::builder::Builder::default();
        builder.push_record(["Block", "Representative", "States"]);
        for block in self.blocks() {
            builder.push_record([
                block.id().to_string(),
                format!("{:?}", block.representative()),
                format!("{{{}}}", block.states().map(|q| format!("{q:?}")).join(", ")),
            ]);
        }
        write!(
            f,
            "{}",
            builder.build().with(tabled::settings::Style::rounded())
        )
    }
}

/// A view on a single block of a [`MinimizationResult`].
#[derive(Debug)]
pub struct Block<'a, N, L> {
    result: &'a MinimizationResult<N, L>,
    id: BlockId,
}

impl<'a, N, L> Clone for Block<'a, N, L> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, N, L> Copy for Block<'a, N, L> {}

impl<'a, N: IndexType, L: Color> Block<'a, N, L> {
    /// The id of the block.
    pub fn id(&self) -> BlockId {
        self.id
    }

    /// The number of nodes in the block.
    pub fn size(&self) -> usize {
        self.result.blocks[self.id].len()
    }

    /// Returns `true` iff the block consists of a single node.
    pub fn is_singleton(&self) -> bool {
        self.size() == 1
    }

    /// The node of the block that was registered first.
    pub fn representative(&self) -> N {
        self.result
            .registry
            .node(self.result.representative_state(self.id))
    }

    /// Iterates over the nodes of the block in registration order.
    pub fn states(&self) -> impl Iterator<Item = N> + 'a {
        let result: &'a MinimizationResult<N, L> = self.result;
        let registry = &result.registry;
        result.blocks[self.id]
            .iter()
            .map(move |&state| registry.node(state))
    }

    /// Returns `true` iff `node` belongs to the block.
    pub fn contains(&self, node: N) -> bool {
        self.result.block_of(node) == Some(self.id)
    }
}
