use std::hash::Hash;

use bit_set::BitSet;
use tracing::{debug, trace};

use crate::{graph::IndexType, Color, Graph};

mod registry;
use registry::{LabelId, StateId, StateRegistry};

mod partition;
pub use partition::BlockId;
use partition::Partition;

mod split;
use split::Segment;

mod result;
pub use result::{Block, MinimizationResult};

mod quotient;
pub use quotient::{BlockAutomaton, BlockEdge, BlockEdgesFrom, BlockMap};

/// Reusable workspace for partition refinement.
///
/// All scratch memory that a run needs besides the partition itself is kept here, so that
/// minimizing many graphs in a row does not allocate it over and over. A run borrows the
/// workspace mutably for its whole duration, hence two runs can never share one. When there is
/// nothing to reuse, the free functions [`minimize`] and [`minimize_from`] are more convenient,
/// they create a fresh workspace for every call.
///
/// ```
/// use automata_minimizer::prelude::*;
///
/// let ts = GraphBuilder::default()
///     .with_state_colors([false, true, true])
///     .with_edges([(0, 'a', 1), (1, 'a', 2), (2, 'a', 1)])
///     .into_edge_lists()
///     .unwrap();
///
/// let mut minimizer = Minimizer::new();
/// let result = minimizer.minimize(&ts, |q| ts.state_color(q));
/// assert_eq!(result.size(), 2);
/// assert!(result.same_block(1, 2));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Minimizer {
    // predecessors of the current splitter, bucketed by the label of the edge
    label_preds: Vec<Vec<StateId>>,
    touched_labels: Vec<LabelId>,
    last_label: Vec<Option<LabelId>>,
    signatures: Vec<Vec<LabelId>>,
    affected: Vec<StateId>,

    block_buckets: Vec<Vec<StateId>>,
    split_blocks: Vec<BlockId>,

    // weak sort
    order: Vec<StateId>,
    segments: Vec<Segment>,
    label_buckets: Vec<Vec<StateId>>,
    bucket_labels: Vec<LabelId>,
    exhausted: Vec<StateId>,
    final_list: Vec<StateId>,
    split_points: BitSet,

    new_blocks: Vec<BlockId>,
}

impl Minimizer {
    /// Creates a new workspace without any memory reserved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimizes all nodes of `graph` with respect to the initial classification given by
    /// `classify`. See [`minimize`] for details.
    pub fn minimize<G, K, F>(
        &mut self,
        graph: &G,
        classify: F,
    ) -> MinimizationResult<G::Node, G::Label>
    where
        G: Graph,
        K: Eq + Hash,
        F: FnMut(G::Node) -> K,
    {
        let registry = StateRegistry::from_graph(graph);
        self.run(registry, classify)
    }

    /// Minimizes the nodes of `graph` that are reachable from `start` with respect to the
    /// initial classification given by `classify`. See [`minimize_from`] for details.
    pub fn minimize_from<G, K, F, I>(
        &mut self,
        graph: &G,
        classify: F,
        start: I,
    ) -> MinimizationResult<G::Node, G::Label>
    where
        G: Graph,
        K: Eq + Hash,
        F: FnMut(G::Node) -> K,
        I: IntoIterator<Item = G::Node>,
    {
        let registry = StateRegistry::reachable_from(graph, start);
        self.run(registry, classify)
    }

    fn run<N, L, K, F>(
        &mut self,
        registry: StateRegistry<N, L>,
        classify: F,
    ) -> MinimizationResult<N, L>
    where
        N: IndexType,
        L: Color,
        K: Eq + Hash,
        F: FnMut(N) -> K,
    {
        let mut partition = Partition::initial(registry.nodes(), classify);
        self.prepare(registry.size(), registry.label_count());

        let mut rounds = 0usize;
        while let Some(splitter) = partition.pop_splitter() {
            trace!(
                "round {rounds}: splitting with block {splitter} of size {}, {} blocks in total, {} pending",
                partition.block(splitter).size(),
                partition.size(),
                partition.pending_splitters()
            );
            self.split(registry.graph(), &mut partition, splitter);
            rounds += 1;
        }

        debug!(
            "minimized {} states with {} edges over {} labels into {} blocks in {rounds} rounds",
            registry.size(),
            registry.graph().edge_count(),
            registry.label_count(),
            partition.size()
        );
        MinimizationResult::new(registry, partition)
    }

    /// Sizes the side tables for a run over `states` states and `labels` distinct labels,
    /// keeping whatever capacity is left from earlier runs.
    fn prepare(&mut self, states: usize, labels: usize) {
        self.label_preds.iter_mut().for_each(Vec::clear);
        self.label_preds.resize_with(labels, Vec::new);
        self.label_buckets.iter_mut().for_each(Vec::clear);
        self.label_buckets.resize_with(labels, Vec::new);
        self.signatures.iter_mut().for_each(Vec::clear);
        self.signatures.resize_with(states, Vec::new);
        self.block_buckets.iter_mut().for_each(Vec::clear);

        self.last_label.clear();
        self.last_label.resize(states, None);

        self.touched_labels.clear();
        self.affected.clear();
        self.split_blocks.clear();
        self.order.clear();
        self.segments.clear();
        self.bucket_labels.clear();
        self.exhausted.clear();
        self.final_list.clear();
        self.split_points.clear();
        self.new_blocks.clear();
    }
}

/// Computes the coarsest partition of the nodes of `graph` that refines the classification
/// given by `classify` and is stable under all edges.
///
/// Two nodes end up in the same block if and only if they are assigned equal keys by `classify`
/// and, for every label, either both have no outgoing edge with that label or their successors
/// under that label lie in the same block. Undefined transitions are thus significant and never
/// completed implicitly.
///
/// The keys produced by `classify` must implement [`Eq`] and [`Hash`] consistently, the
/// partition is only as meaningful as that equality is.
///
/// The refinement follows Béal and Crochemore and runs in `O(m log n)` for `m` edges and `n`
/// nodes if every node has at most one outgoing edge per label. If some node has several
/// outgoing edges with the same label, successors are compared as sets: two nodes stay together
/// iff for every label they reach the same blocks. The result is again the coarsest such
/// partition, but every block produced by a split is used as a splitter, which gives up the
/// `O(m log n)` bound.
///
/// # Panics
///
/// Panics if an edge of `graph` leads to a node that is not part of it.
///
/// # Example
///
/// ```
/// use automata_minimizer::prelude::*;
///
/// // a chain 0 -> 1 -> 2 -> 3 where only 3 is accepting and loops
/// let ts = GraphBuilder::default()
///     .with_state_colors([false, false, false, true])
///     .with_edges([(0, 'a', 1), (1, 'a', 2), (2, 'a', 3), (3, 'a', 3)])
///     .into_edge_lists()
///     .unwrap();
/// let result = minimize(&ts, |q| ts.state_color(q));
/// assert_eq!(result.size(), 4);
/// ```
pub fn minimize<G, K, F>(graph: &G, classify: F) -> MinimizationResult<G::Node, G::Label>
where
    G: Graph,
    K: Eq + Hash,
    F: FnMut(G::Node) -> K,
{
    Minimizer::new().minimize(graph, classify)
}

/// Works like [`minimize`], but only considers the nodes that are reachable from one of the
/// nodes in `start`. Nodes that are not reachable do not appear in the result at all. If
/// `start` is empty, the whole graph is minimized.
///
/// # Panics
///
/// Panics if a node in `start` or the target of a reachable edge is not part of `graph`.
pub fn minimize_from<G, K, F, I>(
    graph: &G,
    classify: F,
    start: I,
) -> MinimizationResult<G::Node, G::Label>
where
    G: Graph,
    K: Eq + Hash,
    F: FnMut(G::Node) -> K,
    I: IntoIterator<Item = G::Node>,
{
    Minimizer::new().minimize_from(graph, classify, start)
}


#[cfg(all(test, feature = "random"))]
mod random_tests {
    use itertools::Itertools;

    use crate::{math::Map, prelude::*};

    use super::tests::assert_congruent;

    /// Draws up to `fanout` edges per state and symbol, so states usually have several
    /// successors under the same label.
    fn random_nondeterministic(size: usize, fanout: usize) -> EdgeLists<bool, char> {
        let mut ts = EdgeLists::with_capacity(size);
        for _ in 0..size {
            ts.add_state(fastrand::bool());
        }
        for state in 0..size {
            for symbol in ['a', 'b'] {
                for _ in 0..fastrand::usize(0..=fanout) {
                    ts.add_edge(state, symbol, fastrand::usize(..size));
                }
            }
        }
        ts
    }

    /// Computes the coarsest stable partition by refining signatures until nothing changes. A
    /// signature is the set of pairs of a label and the class of a successor under it.
    fn naive_partition(ts: &EdgeLists<bool, char>) -> math::Partition<usize> {
        let mut class: Vec<usize> = ts
            .state_colors()
            .map(|&accepting| accepting as usize)
            .collect();
        loop {
            let mut ids: Map<(usize, Vec<(char, usize)>), usize> = Map::default();
            let next: Vec<usize> = (0..ts.size())
                .map(|q| {
                    let signature = ts
                        .edges_from(q)
                        .unwrap()
                        .map(|edge| (edge.label(), class[edge.target()]))
                        .sorted()
                        .dedup()
                        .collect_vec();
                    let fresh = ids.len();
                    *ids.entry((class[q], signature)).or_insert(fresh)
                })
                .collect();
            let stable = next.iter().collect::<crate::math::Set<_>>().len()
                == class.iter().collect::<crate::math::Set<_>>().len();
            class = next;
            if stable {
                break;
            }
        }
        class
            .iter()
            .enumerate()
            .into_group_map_by(|&(_, c)| *c)
            .into_values()
            .map(|members| members.into_iter().map(|(q, _)| q).collect_vec())
            .collect()
    }

    #[test_log::test]
    fn agrees_with_naive_refinement() {
        fastrand::seed(0x5eed);
        let mut minimizer = Minimizer::new();
        for size in [1, 2, 5, 12, 40] {
            for _ in 0..20 {
                let complete = random::generate_random_dfa(size, &['a', 'b', 'c']);
                let partial = random::generate_random_partial_dfa(size, &['a', 'b'], 0.3);
                for dfa in [complete, partial] {
                    let result = minimizer.minimize(dfa.ts(), |q| dfa.ts().state_color(q));
                    assert_eq!(result.partition(), naive_partition(dfa.ts()));
                }
            }
        }
    }

    #[test_log::test]
    fn nondeterministic_graphs_agree_with_naive_refinement() {
        fastrand::seed(0xb15);
        let mut minimizer = Minimizer::new();
        for size in [1, 3, 6, 15, 30] {
            for _ in 0..40 {
                let ts = random_nondeterministic(size, 3);
                let result = minimizer.minimize(&ts, |q| ts.state_color(q));
                assert_eq!(result.partition(), naive_partition(&ts));
                assert_congruent(&ts, &result);
            }
        }
    }
}
