use std::{fmt::Debug, hash::Hash};

use crate::{
    minimization::{self, MinimizationResult},
    Color,
};

mod edge;
pub use edge::{EdgeReference, IsEdge};

mod edge_lists;
pub use edge_lists::{EdgeLists, EdgeListsEdgesFrom, EdgeListsState};

mod builder;
pub use builder::{BuildError, GraphBuilder};

mod reachable;
pub use reachable::ReachableNodes;

/// Type that can be used to identify the nodes of a [`Graph`]. Nodes are handed around by
/// value, so they should be cheap to copy, typically they are simply indices.
pub trait IndexType: Copy + Eq + Ord + Hash + Debug {}

impl<T: Copy + Eq + Ord + Hash + Debug> IndexType for T {}

/// A finite graph whose nodes are colored and whose edges are labeled. This is the only thing
/// the minimization needs to know about its input: it must be possible to enumerate all nodes,
/// to obtain the color of a node and to iterate over the outgoing edges of a node, each of which
/// has a target and a label.
///
/// The graph is never modified by any operation in this crate.
pub trait Graph {
    /// The type used to identify nodes.
    type Node: IndexType;
    /// The type of the labels on the edges.
    type Label: Color;
    /// The type of the colors of the nodes.
    type StateColor: Color;

    /// The type of edge that is produced when iterating the outgoing edges of a node.
    type EdgeRef<'this>: IsEdge<Self::Node, Self::Label>
    where
        Self: 'this;

    /// Iterator over the outgoing edges of a node.
    type EdgesFromIter<'this>: Iterator<Item = Self::EdgeRef<'this>>
    where
        Self: 'this;

    /// Iterator over all nodes of the graph.
    type NodesIter<'this>: Iterator<Item = Self::Node>
    where
        Self: 'this;

    /// Returns an iterator over all nodes of the graph.
    fn nodes(&self) -> Self::NodesIter<'_>;

    /// Returns an iterator over the edges leaving `node`, or `None` if `node` is not part of
    /// the graph.
    fn edges_from(&self, node: Self::Node) -> Option<Self::EdgesFromIter<'_>>;

    /// Returns the color of `node`, or `None` if `node` is not part of the graph.
    fn state_color(&self, node: Self::Node) -> Option<Self::StateColor>;

    /// Returns the number of nodes in the graph.
    fn size(&self) -> usize {
        self.nodes().count()
    }

    /// Returns `true` iff `node` is part of the graph.
    fn contains_node(&self, node: Self::Node) -> bool {
        self.edges_from(node).is_some()
    }

    /// Returns an iterator over the nodes that can be reached from any of the `start` nodes,
    /// including the start nodes themselves. The nodes are produced in depth-first order.
    fn reachable_from<I>(&self, start: I) -> ReachableNodes<'_, Self>
    where
        Self: Sized,
        I: IntoIterator<Item = Self::Node>,
    {
        ReachableNodes::new(self, start)
    }

    /// Minimizes `self` with the color of each node as its initial classification. Nodes without
    /// a color are grouped together. See [`minimization::minimize`] for details.
    fn minimize(&self) -> MinimizationResult<Self::Node, Self::Label>
    where
        Self: Sized,
    {
        minimization::minimize(self, |node| self.state_color(node))
    }

    /// Works like [`Graph::minimize`], but only takes nodes into account that are reachable
    /// from the given `start` nodes.
    fn minimize_from<I>(&self, start: I) -> MinimizationResult<Self::Node, Self::Label>
    where
        Self: Sized,
        I: IntoIterator<Item = Self::Node>,
    {
        minimization::minimize_from(self, |node| self.state_color(node), start)
    }

    /// Collects `self` into an [`EdgeLists`]. The nodes are renumbered in the order in which
    /// [`Graph::nodes`] produces them, so the `i`-th node becomes state `i`.
    fn collect_edge_lists(&self) -> EdgeLists<Self::StateColor, Self::Label>
    where
        Self: Sized,
    {
        let nodes: crate::math::IndexedSet<Self::Node> = self.nodes().collect();
        let mut out = EdgeLists::with_capacity(nodes.len());
        for &node in &nodes {
            out.add_state(
                self.state_color(node)
                    .expect("Every node of the graph must be colored"),
            );
        }
        for (source, &node) in nodes.iter().enumerate() {
            for edge in self
                .edges_from(node)
                .expect("Every enumerated node must have outgoing edges")
            {
                let target = nodes
                    .get_index_of(&edge.target())
                    .unwrap_or_else(|| unknown_node(edge.target()));
                out.add_edge(source, edge.label(), target);
            }
        }
        out
    }
}

/// Reports that a node which does not belong to the graph was referenced. This is a violation of
/// the contract of [`Graph`], so there is nothing sensible left to do but to abort.
#[track_caller]
pub(crate) fn unknown_node<N: Debug>(node: N) -> ! {
    tracing::error!("encountered node {node:?}, which is not part of the graph");
    panic!("node {node:?} is referenced but not part of the graph");
}

impl<G: Graph> Graph for &G {
    type Node = G::Node;
    type Label = G::Label;
    type StateColor = G::StateColor;
    type EdgeRef<'this> = G::EdgeRef<'this> where Self: 'this;
    type EdgesFromIter<'this> = G::EdgesFromIter<'this> where Self: 'this;
    type NodesIter<'this> = G::NodesIter<'this> where Self: 'this;

    fn nodes(&self) -> Self::NodesIter<'_> {
        G::nodes(self)
    }

    fn edges_from(&self, node: Self::Node) -> Option<Self::EdgesFromIter<'_>> {
        G::edges_from(self, node)
    }

    fn state_color(&self, node: Self::Node) -> Option<Self::StateColor> {
        G::state_color(self, node)
    }

    fn size(&self) -> usize {
        G::size(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn collect_renumbers_in_node_order() {
        let ts = GraphBuilder::default()
            .with_state_colors(['x', 'y', 'z'])
            .with_edges([(0, 1u8, 1), (1, 2, 2), (2, 1, 0)])
            .into_edge_lists()
            .unwrap();
        let collected = (&ts).collect_edge_lists();
        assert_eq!(collected, ts);
        assert_eq!((&ts).size(), 3);
        assert!(ts.contains_node(2));
        assert!(!ts.contains_node(3));
    }
}
