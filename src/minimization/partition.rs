use std::hash::Hash;

use tracing::trace;

use crate::math::IndexedMap;

use super::registry::StateId;

/// Identifier of a block. Ids are handed out consecutively and never reused, so within one
/// [`super::MinimizationResult`] they form the range `0..size`.
pub type BlockId = usize;

/// An equivalence class of states during refinement.
#[derive(Debug, Clone)]
pub(crate) struct Block {
    states: Vec<StateId>,
    splitter_position: Option<usize>,
    sub_blocks: Vec<Vec<StateId>>,
    covered: usize,
}

impl Block {
    fn new(states: Vec<StateId>) -> Self {
        Self {
            states,
            splitter_position: None,
            sub_blocks: vec![],
            covered: 0,
        }
    }

    pub(crate) fn size(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn states(&self) -> &[StateId] {
        &self.states
    }

    /// Starts a new candidate sub-block, subsequent calls to [`Block::add_to_sub_block`] fill it.
    pub(crate) fn create_sub_block(&mut self) {
        self.sub_blocks.push(vec![]);
    }

    pub(crate) fn add_to_sub_block(&mut self, state: StateId) {
        self.sub_blocks
            .last_mut()
            .expect("a sub-block must be created before states are added to it")
            .push(state);
        self.covered += 1;
    }

    /// Removes the candidate sub-blocks, returning them together with the number of states they
    /// cover in total.
    pub(crate) fn take_sub_blocks(&mut self) -> (Vec<Vec<StateId>>, usize) {
        let covered = std::mem::take(&mut self.covered);
        (std::mem::take(&mut self.sub_blocks), covered)
    }
}

/// The current partition of the states into blocks together with the queue of pending
/// splitters.
///
/// Blocks live in an arena indexed by their id. Refinement never empties a block (either the
/// remainder stays in it or the first sub-block replaces its content), so blocks are never
/// removed and the arena always is the set of live blocks. Every state knows its block and its
/// position within that block, which makes removing it from the block a constant time
/// operation. In the same way, every block knows whether and where it sits in the splitter queue.
#[derive(Debug, Clone, Default)]
pub(crate) struct Partition {
    blocks: Vec<Block>,
    block_of: Vec<BlockId>,
    position: Vec<usize>,
    splitters: Vec<BlockId>,
}

impl Partition {
    /// Groups the states `0..n` by the key that `classify` assigns to them, where `n` is the
    /// number of items produced by `items`. Blocks are created in the order in which their key is
    /// first encountered and every block is enqueued as a splitter.
    pub(crate) fn initial<T, K, F, I>(items: I, mut classify: F) -> Self
    where
        I: IntoIterator<Item = T>,
        K: Eq + Hash,
        F: FnMut(T) -> K,
    {
        let mut classes: IndexedMap<K, Vec<StateId>> = IndexedMap::default();
        let mut count = 0;
        for (state, item) in items.into_iter().enumerate() {
            classes.entry(classify(item)).or_default().push(state);
            count += 1;
        }

        let mut partition = Self {
            blocks: Vec::with_capacity(classes.len()),
            block_of: vec![0; count],
            position: vec![0; count],
            splitters: Vec::with_capacity(classes.len()),
        };
        for (_, states) in classes {
            if states.is_empty() {
                continue;
            }
            let block = partition.add_block(states);
            partition.enqueue(block);
        }
        trace!(
            "initial partition has {} blocks for {} states",
            partition.size(),
            count
        );
        partition
    }

    /// Returns the number of blocks.
    pub(crate) fn size(&self) -> usize {
        self.blocks.len()
    }

    pub(crate) fn block(&self, id: BlockId) -> &Block {
        &self.blocks[id]
    }

    pub(crate) fn block_mut(&mut self, id: BlockId) -> &mut Block {
        &mut self.blocks[id]
    }

    pub(crate) fn block_of(&self, state: StateId) -> BlockId {
        self.block_of[state]
    }

    /// Returns `true` iff `state` is the only member of its block.
    pub(crate) fn is_singleton(&self, state: StateId) -> bool {
        self.blocks[self.block_of[state]].size() == 1
    }

    /// Creates a new block with the given states, which must not belong to any other block
    /// anymore. Returns the id of the new block.
    pub(crate) fn add_block(&mut self, states: Vec<StateId>) -> BlockId {
        let id = self.blocks.len();
        for (i, &state) in states.iter().enumerate() {
            self.block_of[state] = id;
            self.position[state] = i;
        }
        self.blocks.push(Block::new(states));
        id
    }

    /// Replaces the content of the block `id` by `states`. The states that are dropped from the
    /// block must be moved to other blocks afterwards.
    pub(crate) fn replace_states(&mut self, id: BlockId, states: Vec<StateId>) {
        for (i, &state) in states.iter().enumerate() {
            self.block_of[state] = id;
            self.position[state] = i;
        }
        self.blocks[id].states = states;
    }

    /// Removes the given states from the block `id` in time linear in the number of states that
    /// are removed.
    pub(crate) fn remove_states(&mut self, id: BlockId, states: &[StateId]) {
        for &state in states {
            debug_assert_eq!(self.block_of[state], id);
            let position = self.position[state];
            let members = &mut self.blocks[id].states;
            members.swap_remove(position);
            if let Some(&moved) = members.get(position) {
                self.position[moved] = position;
            }
        }
    }

    /// Adds the block `id` to the splitter queue, unless it is already enqueued.
    pub(crate) fn enqueue(&mut self, id: BlockId) {
        if self.blocks[id].splitter_position.is_none() {
            self.blocks[id].splitter_position = Some(self.splitters.len());
            self.splitters.push(id);
        }
    }

    /// Takes some block out of the splitter queue. Which block is chosen does not influence the
    /// final partition.
    pub(crate) fn pop_splitter(&mut self) -> Option<BlockId> {
        let id = self.splitters.pop()?;
        self.blocks[id].splitter_position = None;
        Some(id)
    }

    /// Removes the block `id` from the splitter queue. Returns `true` iff it was enqueued.
    pub(crate) fn remove_splitter(&mut self, id: BlockId) -> bool {
        let Some(position) = self.blocks[id].splitter_position.take() else {
            return false;
        };
        self.splitters.swap_remove(position);
        if let Some(&moved) = self.splitters.get(position) {
            self.blocks[moved].splitter_position = Some(position);
        }
        true
    }

    /// Returns the number of blocks waiting in the splitter queue.
    pub(crate) fn pending_splitters(&self) -> usize {
        self.splitters.len()
    }

    /// Decomposes the partition into the member lists of its blocks, ordered by block id, and
    /// the block of every state.
    pub(crate) fn into_parts(self) -> (Vec<Vec<StateId>>, Vec<BlockId>) {
        (
            self.blocks.into_iter().map(|block| block.states).collect(),
            self.block_of,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Partition;

    #[test]
    fn initial_partition_groups_by_key() {
        let partition = Partition::initial(["x", "y", "x", "z", "y"], |c| c);
        assert_eq!(partition.size(), 3);
        assert_eq!(partition.block(0).states(), &[0, 2]);
        assert_eq!(partition.block(1).states(), &[1, 4]);
        assert_eq!(partition.block(2).states(), &[3]);
        assert_eq!(partition.block_of(4), 1);
        assert!(partition.is_singleton(3));
        assert_eq!(partition.pending_splitters(), 3);
    }

    #[test]
    fn removing_states_keeps_positions_consistent() {
        let mut partition = Partition::initial(0..6, |_| ());
        partition.remove_states(0, &[1, 5]);
        let block = partition.add_block(vec![1, 5]);
        assert_eq!(block, 1);

        let mut rest = partition.block(0).states().to_vec();
        rest.sort();
        assert_eq!(rest, vec![0, 2, 3, 4]);
        for &state in partition.block(0).states() {
            assert_eq!(partition.block_of(state), 0);
        }
        partition.remove_states(0, &[4, 0]);
        let mut rest = partition.block(0).states().to_vec();
        rest.sort();
        assert_eq!(rest, vec![2, 3]);
    }

    #[test]
    fn splitter_queue_removal() {
        let mut partition = Partition::initial(0..4, |q| q);
        assert_eq!(partition.pending_splitters(), 4);
        assert!(partition.remove_splitter(1));
        assert!(!partition.remove_splitter(1));
        let mut popped = vec![];
        while let Some(id) = partition.pop_splitter() {
            popped.push(id);
        }
        popped.sort();
        assert_eq!(popped, vec![0, 2, 3]);
        partition.enqueue(2);
        partition.enqueue(2);
        assert_eq!(partition.pending_splitters(), 1);
    }
}
