use crate::{
    graph::{unknown_node, Graph, IsEdge},
    math::IndexedSet,
};

/// Index of a state record during a run, which coincides with the position of the corresponding
/// node in the registry.
pub(crate) type StateId = usize;
/// Index of an interned transition label.
pub(crate) type LabelId = usize;
/// Index of an edge record.
pub(crate) type EdgeId = usize;

/// An edge between two registered states. Edges are created once and never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StateEdge {
    pub(crate) source: StateId,
    pub(crate) target: StateId,
    pub(crate) label: LabelId,
}

/// The edges of a single state, split by direction.
#[derive(Debug, Clone, Default)]
pub(crate) struct StateRecord {
    pub(crate) outgoing: Vec<EdgeId>,
    pub(crate) incoming: Vec<EdgeId>,
}

/// The label-free part of the registry: states with their incoming and outgoing edges. This is
/// all the refinement itself needs to look at.
#[derive(Debug, Clone, Default)]
pub(crate) struct StateGraph {
    states: Vec<StateRecord>,
    edges: Vec<StateEdge>,
    nondeterministic: bool,
}

impl StateGraph {
    pub(crate) fn incoming(&self, state: StateId) -> impl Iterator<Item = &StateEdge> + '_ {
        self.states[state]
            .incoming
            .iter()
            .map(move |&edge| &self.edges[edge])
    }

    pub(crate) fn outgoing(&self, state: StateId) -> impl Iterator<Item = &StateEdge> + '_ {
        self.states[state]
            .outgoing
            .iter()
            .map(move |&edge| &self.edges[edge])
    }

    pub(crate) fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` iff some state has two or more outgoing edges with the same label.
    pub(crate) fn is_nondeterministic(&self) -> bool {
        self.nondeterministic
    }

    fn add_state(&mut self) -> StateId {
        self.states.push(StateRecord::default());
        self.states.len() - 1
    }

    fn add_edge(&mut self, source: StateId, label: LabelId, target: StateId) {
        let id = self.edges.len();
        self.edges.push(StateEdge {
            source,
            target,
            label,
        });
        self.states[source].outgoing.push(id);
        self.states[target].incoming.push(id);
    }
}

/// Maps the nodes of a graph to state records for the duration of one minimization. Nodes and
/// labels are interned, so the position of a node is its state id and the position of a label
/// is its label id.
#[derive(Debug, Clone)]
pub(crate) struct StateRegistry<N, L> {
    nodes: IndexedSet<N>,
    labels: IndexedSet<L>,
    graph: StateGraph,
}

impl<N, L> StateRegistry<N, L>
where
    N: crate::graph::IndexType,
    L: crate::Color,
{
    /// Registers every node of `graph`.
    pub(crate) fn from_graph<G>(graph: &G) -> Self
    where
        G: Graph<Node = N, Label = L>,
    {
        Self::build(graph, graph.nodes())
    }

    /// Registers the nodes of `graph` that are reachable from `start`. If `start` is empty,
    /// every node is registered.
    pub(crate) fn reachable_from<G, I>(graph: &G, start: I) -> Self
    where
        G: Graph<Node = N, Label = L>,
        I: IntoIterator<Item = N>,
    {
        let start: Vec<_> = start.into_iter().collect();
        if start.is_empty() {
            Self::from_graph(graph)
        } else {
            Self::build(graph, graph.reachable_from(start))
        }
    }

    fn build<G, I>(graph: &G, nodes: I) -> Self
    where
        G: Graph<Node = N, Label = L>,
        I: IntoIterator<Item = N>,
    {
        let nodes: IndexedSet<N> = nodes.into_iter().collect();
        let mut labels = IndexedSet::default();
        let mut states = StateGraph::default();
        // the last source for which an edge with the label was registered
        let mut last_source: Vec<Option<StateId>> = vec![];

        for _ in 0..nodes.len() {
            states.add_state();
        }
        for (source, &node) in nodes.iter().enumerate() {
            let edges = graph.edges_from(node).unwrap_or_else(|| unknown_node(node));
            for edge in edges {
                let target = nodes
                    .get_index_of(&edge.target())
                    .unwrap_or_else(|| unknown_node(edge.target()));
                let (label, _) = labels.insert_full(edge.label());
                if label == last_source.len() {
                    last_source.push(None);
                }
                if last_source[label].replace(source) == Some(source) {
                    states.nondeterministic = true;
                }
                states.add_edge(source, label, target);
            }
        }

        Self {
            nodes,
            labels,
            graph: states,
        }
    }

    pub(crate) fn graph(&self) -> &StateGraph {
        &self.graph
    }

    pub(crate) fn size(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn label_count(&self) -> usize {
        self.labels.len()
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().copied()
    }

    pub(crate) fn node(&self, state: StateId) -> N {
        self.nodes[state]
    }

    pub(crate) fn state_of(&self, node: &N) -> Option<StateId> {
        self.nodes.get_index_of(node)
    }

    pub(crate) fn label(&self, label: LabelId) -> &L {
        &self.labels[label]
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    use super::StateRegistry;

    #[test]
    fn registry_interns_labels_and_indexes_predecessors() {
        let ts = GraphBuilder::default()
            .default_color(Void)
            .with_edges([(0, 'a', 1), (1, 'b', 1), (2, 'a', 1), (3, 'c', 0)])
            .into_edge_lists()
            .unwrap();

        let registry = StateRegistry::from_graph(&ts);
        assert_eq!(registry.size(), 4);
        assert_eq!(registry.label_count(), 3);
        assert_eq!(registry.graph().edge_count(), 4);
        let mut preds: Vec<_> = registry
            .graph()
            .incoming(1)
            .map(|edge| (edge.source, *registry.label(edge.label)))
            .collect();
        preds.sort();
        assert_eq!(preds, vec![(0, 'a'), (1, 'b'), (2, 'a')]);
        assert_eq!(registry.graph().outgoing(3).count(), 1);

        let restricted = StateRegistry::reachable_from(&ts, [2]);
        assert_eq!(restricted.size(), 2);
        assert_eq!(restricted.state_of(&3), None);
        assert_eq!(restricted.node(0), 2);
        assert_eq!(restricted.label_count(), 2);

        let everything = StateRegistry::reachable_from(&ts, []);
        assert_eq!(everything.size(), 4);
        assert!(!everything.graph().is_nondeterministic());
    }

    #[test]
    fn registry_detects_repeated_labels() {
        let ts = GraphBuilder::default()
            .default_color(Void)
            .with_edges([(0, 'a', 1), (0, 'a', 2), (1, 'b', 2), (2, 'b', 1), (2, 'a', 2)])
            .into_edge_lists()
            .unwrap();
        assert!(StateRegistry::from_graph(&ts).graph().is_nondeterministic());
        // the repeated a-edges of 0 are not reachable from 1
        assert!(!StateRegistry::reachable_from(&ts, [1])
            .graph()
            .is_nondeterministic());
    }
}
