//! The refinement step: given a splitter block `B`, every block is divided such that afterwards
//! any two of its states agree on the set of labels with which they reach `B`.
//!
//! A round works in four phases.
//! 1. The predecessors of `B` are collected per label. Labels are numbered in the order in which
//!    the round discovers them, and each affected state gets a signature: the labels leading
//!    into `B`, in discovery order and without repetitions. States in singleton blocks cannot be
//!    split and are skipped right away.
//! 2. The affected states are grouped by their current block.
//! 3. Within each block the states are sorted by their signature with a most significant first
//!    bucket sort, one signature position at a time. Maximal runs of equal signatures become the
//!    candidate sub-blocks of the block.
//! 4. Every touched block is split according to its candidates and the splitter queue is
//!    updated. If the split block was still waiting in the queue, all of its parts are enqueued.
//!    Otherwise the largest part is left out, which is sound as long as every state has at most
//!    one outgoing edge per label. For a nondeterministic graph all parts are enqueued.

use bit_set::BitSet;
use tracing::trace;

use super::{
    partition::{BlockId, Partition},
    registry::{StateGraph, StateId},
    Minimizer,
};

/// A range of the `order` buffer whose states agree on the first `depth` positions of their
/// signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Segment {
    start: usize,
    end: usize,
    depth: usize,
}

impl Minimizer {
    /// Refines `partition` with respect to the block `splitter`.
    pub(super) fn split(
        &mut self,
        graph: &StateGraph,
        partition: &mut Partition,
        splitter: BlockId,
    ) {
        self.collect_signatures(graph, partition, splitter);
        if self.affected.is_empty() {
            return;
        }
        self.group_by_block(partition);
        self.sort_signatures();
        self.create_sub_blocks(partition);

        let skip_largest = !graph.is_nondeterministic();
        let split_blocks = std::mem::take(&mut self.split_blocks);
        for &block in &split_blocks {
            self.update_block(partition, block, skip_largest);
        }
        self.split_blocks = split_blocks;
        self.split_blocks.clear();
        self.affected.clear();
    }

    fn collect_signatures(
        &mut self,
        graph: &StateGraph,
        partition: &Partition,
        splitter: BlockId,
    ) {
        for &state in partition.block(splitter).states() {
            for edge in graph.incoming(state) {
                if partition.is_singleton(edge.source) {
                    continue;
                }
                let preds = &mut self.label_preds[edge.label];
                if preds.is_empty() {
                    self.touched_labels.push(edge.label);
                }
                preds.push(edge.source);
            }
        }

        for &label in &self.touched_labels {
            for state in self.label_preds[label].drain(..) {
                // several edges with the same label may lead into the splitter
                if self.last_label[state] == Some(label) {
                    continue;
                }
                self.last_label[state] = Some(label);
                if self.signatures[state].is_empty() {
                    self.affected.push(state);
                }
                self.signatures[state].push(label);
            }
        }
        self.touched_labels.clear();

        for &state in &self.affected {
            self.last_label[state] = None;
        }
    }

    fn group_by_block(&mut self, partition: &Partition) {
        if self.block_buckets.len() < partition.size() {
            self.block_buckets.resize_with(partition.size(), Vec::new);
        }
        for &state in &self.affected {
            let block = partition.block_of(state);
            if self.block_buckets[block].is_empty() {
                self.split_blocks.push(block);
            }
            self.block_buckets[block].push(state);
        }

        for &block in &self.split_blocks {
            let start = self.order.len();
            self.order.append(&mut self.block_buckets[block]);
            self.segments.push(Segment {
                start,
                end: self.order.len(),
                depth: 0,
            });
        }
    }

    /// Sorts the segments of the `order` buffer by signature and moves the states into
    /// `final_list`, where every run of equal signatures starts at a split point.
    /// Segments are processed depth first, so the runs of one block end up next to each other.
    fn sort_signatures(&mut self) {
        while let Some(Segment { start, end, depth }) = self.segments.pop() {
            if end - start == 1 {
                finalize(
                    &mut self.final_list,
                    &mut self.split_points,
                    [self.order[start]],
                );
                continue;
            }

            for &state in &self.order[start..end] {
                match self.signatures[state].get(depth) {
                    None => self.exhausted.push(state),
                    Some(&label) => {
                        let bucket = &mut self.label_buckets[label];
                        if bucket.is_empty() {
                            self.bucket_labels.push(label);
                        }
                        bucket.push(state);
                    }
                }
            }

            if !self.exhausted.is_empty() {
                finalize(
                    &mut self.final_list,
                    &mut self.split_points,
                    self.exhausted.drain(..),
                );
            }

            let mut position = start;
            for label in self.bucket_labels.drain(..) {
                let bucket = &mut self.label_buckets[label];
                let child = Segment {
                    start: position,
                    end: position + bucket.len(),
                    depth: depth + 1,
                };
                for state in bucket.drain(..) {
                    self.order[position] = state;
                    position += 1;
                }
                self.segments.push(child);
            }
        }
        self.order.clear();
    }

    fn create_sub_blocks(&mut self, partition: &mut Partition) {
        let mut current = None;
        for (position, &state) in self.final_list.iter().enumerate() {
            let block = partition.block_of(state);
            if current != Some(block) || self.split_points.contains(position) {
                partition.block_mut(block).create_sub_block();
                current = Some(block);
            }
            partition.block_mut(block).add_to_sub_block(state);
            self.signatures[state].clear();
        }
        self.final_list.clear();
        self.split_points.clear();
    }

    /// Splits `block` into its candidate sub-blocks and whatever remains of it.
    fn update_block(&mut self, partition: &mut Partition, block: BlockId, skip_largest: bool) {
        let (sub_blocks, covered) = partition.block_mut(block).take_sub_blocks();
        let size = partition.block(block).size();
        if covered == 0 || (covered == size && sub_blocks.len() == 1) {
            return;
        }

        self.new_blocks.clear();
        if covered == size {
            let mut sub_blocks = sub_blocks.into_iter();
            if let Some(first) = sub_blocks.next() {
                partition.replace_states(block, first);
            }
            self.new_blocks.push(block);
            for states in sub_blocks {
                self.new_blocks.push(partition.add_block(states));
            }
        } else {
            for states in sub_blocks {
                partition.remove_states(block, &states);
                self.new_blocks.push(partition.add_block(states));
            }
            self.new_blocks.push(block);
        }
        trace!(
            "split block {block} into {:?}",
            self.new_blocks
                .iter()
                .map(|&id| (id, partition.block(id).size()))
                .collect::<Vec<_>>()
        );

        if partition.remove_splitter(block) || !skip_largest {
            for &id in &self.new_blocks {
                partition.enqueue(id);
            }
        } else {
            let largest = self
                .new_blocks
                .iter()
                .copied()
                .max_by_key(|&id| partition.block(id).size());
            for &id in &self.new_blocks {
                if Some(id) != largest {
                    partition.enqueue(id);
                }
            }
        }
    }
}

/// Appends a run of states with equal signatures to `final_list` and marks where it starts.
fn finalize<I>(final_list: &mut Vec<StateId>, split_points: &mut BitSet, run: I)
where
    I: IntoIterator<Item = StateId>,
{
    split_points.insert(final_list.len());
    final_list.extend(run);
}
