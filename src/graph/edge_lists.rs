use std::ops::Range;

use crate::{math::Set, Color};

use super::{EdgeReference, Graph};

/// A single state of an [`EdgeLists`], consisting of its color and the list of its outgoing
/// edges, each of which is stored as a pair of label and target.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EdgeListsState<Q, L> {
    color: Q,
    edges: Vec<(L, usize)>,
}

impl<Q, L> EdgeListsState<Q, L> {
    /// Gives a reference to the color of the state.
    pub fn color(&self) -> &Q {
        &self.color
    }

    /// Returns the outgoing edges as `(label, target)` pairs.
    pub fn edges(&self) -> &[(L, usize)] {
        &self.edges
    }
}

/// An implementation of a graph with states colored by `Q` and edges labeled with `L`. It stores
/// the states in a vector and every state keeps the list of its outgoing edges, so states are
/// indexed by their position and there is no way to remove one.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct EdgeLists<Q, L> {
    states: Vec<EdgeListsState<Q, L>>,
}

impl<Q, L> Default for EdgeLists<Q, L> {
    fn default() -> Self {
        Self { states: vec![] }
    }
}

impl<Q: Color, L: Color> EdgeLists<Q, L> {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty graph that has room for `states` states.
    pub fn with_capacity(states: usize) -> Self {
        Self {
            states: Vec::with_capacity(states),
        }
    }

    /// Adds a new state with the given `color` and returns its index.
    pub fn add_state(&mut self, color: Q) -> usize {
        self.states.push(EdgeListsState {
            color,
            edges: vec![],
        });
        self.states.len() - 1
    }

    /// Adds an edge from `source` to `target` which is labeled with `label`. Returns `false`
    /// and leaves `self` untouched if either of the two states does not exist.
    pub fn add_edge(&mut self, source: usize, label: L, target: usize) -> bool {
        if target >= self.states.len() {
            return false;
        }
        match self.states.get_mut(source) {
            Some(state) => {
                state.edges.push((label, target));
                true
            }
            None => false,
        }
    }

    /// Returns the state with index `state`, if it exists.
    pub fn state(&self, state: usize) -> Option<&EdgeListsState<Q, L>> {
        self.states.get(state)
    }

    /// Returns an iterator over the colors of all states, ordered by index.
    pub fn state_colors(&self) -> impl Iterator<Item = &Q> + '_ {
        self.states.iter().map(|state| &state.color)
    }

    /// Returns the total number of edges.
    pub fn edge_count(&self) -> usize {
        self.states.iter().map(|state| state.edges.len()).sum()
    }

    /// Returns the target of the first edge leaving `state` whose label satisfies `matches`.
    pub fn successor_by<F>(&self, state: usize, mut matches: F) -> Option<(&L, usize)>
    where
        F: FnMut(&L) -> bool,
    {
        self.states
            .get(state)?
            .edges
            .iter()
            .find(|(label, _)| matches(label))
            .map(|(label, target)| (label, *target))
    }

    /// Returns the target of the edge leaving `state` with label `label`, if there is one.
    pub fn successor(&self, state: usize, label: &L) -> Option<usize> {
        self.successor_by(state, |l| l == label).map(|(_, target)| target)
    }

    /// Returns the first state which has two outgoing edges with equal labels, or `None` if
    /// there is no such state. In that case `self` is deterministic.
    pub fn find_nondeterministic_state(&self) -> Option<usize> {
        self.states.iter().position(|state| {
            let mut seen = Set::default();
            state.edges.iter().any(|(label, _)| !seen.insert(label))
        })
    }

    /// Returns `true` iff no state has two outgoing edges with the same label.
    pub fn is_deterministic(&self) -> bool {
        self.find_nondeterministic_state().is_none()
    }
}

/// Iterator over the outgoing edges of a state in an [`EdgeLists`].
#[derive(Clone, Debug)]
pub struct EdgeListsEdgesFrom<'a, L> {
    source: usize,
    it: std::slice::Iter<'a, (L, usize)>,
}

impl<'a, L> Iterator for EdgeListsEdgesFrom<'a, L> {
    type Item = EdgeReference<'a, usize, L>;

    fn next(&mut self) -> Option<Self::Item> {
        self.it
            .next()
            .map(|(label, target)| EdgeReference::new(self.source, label, *target))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.it.size_hint()
    }
}

impl<Q: Color, L: Color> Graph for EdgeLists<Q, L> {
    type Node = usize;
    type Label = L;
    type StateColor = Q;
    type EdgeRef<'this> = EdgeReference<'this, usize, L> where Self: 'this;
    type EdgesFromIter<'this> = EdgeListsEdgesFrom<'this, L> where Self: 'this;
    type NodesIter<'this> = Range<usize> where Self: 'this;

    fn nodes(&self) -> Self::NodesIter<'_> {
        0..self.states.len()
    }

    fn edges_from(&self, node: usize) -> Option<Self::EdgesFromIter<'_>> {
        self.states.get(node).map(|state| EdgeListsEdgesFrom {
            source: node,
            it: state.edges.iter(),
        })
    }

    fn state_color(&self, node: usize) -> Option<Q> {
        self.states.get(node).map(|state| state.color.clone())
    }

    fn size(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    #[test]
    fn edge_lists_manipulation() {
        let mut ts = EdgeLists::new();
        let q0 = ts.add_state(false);
        let q1 = ts.add_state(true);
        assert!(ts.add_edge(q0, 'a', q1));
        assert!(ts.add_edge(q1, 'a', q1));
        assert!(!ts.add_edge(q1, 'b', 7));
        assert!(!ts.add_edge(7, 'b', q0));

        assert_eq!(ts.size(), 2);
        assert_eq!(ts.edge_count(), 2);
        assert_eq!(ts.successor(q0, &'a'), Some(q1));
        assert_eq!(ts.successor(q0, &'b'), None);
        assert_eq!(ts.state_color(q1), Some(true));
        assert_eq!(ts.state_color(2), None);
        assert!(ts.edges_from(2).is_none());
        assert_eq!(
            ts.edges_from(q0).unwrap().map(|e| e.into_tuple()).collect::<Vec<_>>(),
            vec![(0, 'a', 1)]
        );
        assert!(ts.is_deterministic());

        ts.add_edge(q0, 'a', q0);
        assert_eq!(ts.find_nondeterministic_state(), Some(q0));
    }
}
