use crate::math::Set;

use super::{unknown_node, Graph, IsEdge};

/// Allows iterating over the nodes of a [`Graph`] that are reachable from a given set of
/// start nodes. The traversal is depth-first and every node is produced exactly once.
///
/// Every node that is encountered, including the start nodes, has to be part of the graph.
/// Meeting a node for which [`Graph::edges_from`] returns `None` means the graph is malformed and
/// causes a panic.
#[derive(Debug, Clone)]
pub struct ReachableNodes<'a, G: Graph> {
    graph: &'a G,
    seen: Set<G::Node>,
    stack: Vec<G::Node>,
}

impl<'a, G: Graph> ReachableNodes<'a, G> {
    /// Creates a new iterator over the nodes of `graph` that can be reached from `start`.
    pub fn new<I: IntoIterator<Item = G::Node>>(graph: &'a G, start: I) -> Self {
        let mut seen = Set::default();
        let mut stack: Vec<_> = start.into_iter().filter(|q| seen.insert(*q)).collect();
        // the stack is popped from the back, this way the first start node comes first
        stack.reverse();
        Self { graph, seen, stack }
    }
}

impl<'a, G: Graph> Iterator for ReachableNodes<'a, G> {
    type Item = G::Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let edges = self
            .graph
            .edges_from(node)
            .unwrap_or_else(|| unknown_node(node));
        for edge in edges {
            let target = edge.target();
            if self.seen.insert(target) {
                self.stack.push(target);
            }
        }
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use crate::prelude::*;

    #[test]
    fn reachable_nodes() {
        let ts = GraphBuilder::default()
            .default_color(Void)
            .with_edges([(0, 'a', 1), (1, 'a', 2), (2, 'a', 0), (3, 'a', 0), (4, 'b', 4)])
            .into_edge_lists()
            .unwrap();

        assert_eq!(ts.reachable_from([0]).sorted().collect_vec(), vec![0, 1, 2]);
        assert_eq!(ts.reachable_from([3]).next(), Some(3));
        assert_eq!(
            ts.reachable_from([4, 3, 4]).sorted().collect_vec(),
            vec![0, 1, 2, 3, 4]
        );
        assert_eq!(ts.reachable_from([]).count(), 0);
    }

    #[test]
    #[should_panic(expected = "not part of the graph")]
    fn reachable_from_unknown_node() {
        let ts = GraphBuilder::default()
            .default_color(Void)
            .with_edges([(0, 'a', 0)])
            .into_edge_lists()
            .unwrap();
        let _ = ts.reachable_from([5]).count();
    }
}
