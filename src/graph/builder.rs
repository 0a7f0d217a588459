use thiserror::Error;

use crate::{
    automaton::{Automaton, MealyMachine, MooreMachine, DFA},
    Color, Void,
};

use super::EdgeLists;

/// Errors that can occur when turning a [`GraphBuilder`] into a graph or an automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BuildError {
    /// The state was referenced but never given a color, and no default color was set.
    #[error("state {0} has no color and no default color is set")]
    MissingColor(usize),
    /// The designated initial state is not part of the graph.
    #[error("initial state {0} does not exist")]
    UnknownInitial(usize),
    /// The state has two outgoing edges with the same label, which is not allowed in a
    /// deterministic automaton.
    #[error("state {0} has more than one outgoing edge with the same label")]
    Nondeterministic(usize),
}

/// Helper struct for the construction of graphs. It stores a list of edges, a list of colors and
/// an optional default color which is given to every state that is not colored explicitly.
/// States are identified by `usize` indices and the graph that is built contains every state up
/// to the largest index that is mentioned.
///
/// # Example
///
/// We want to create a DFA with two states 0 and 1 over the alphabet `['a', 'b']` with the
/// following transitions:
/// - From state 0 to state 0 on symbol 'a'
/// - From state 0 to state 1 on symbol 'b'
/// - From state 1 to state 1 on symbol 'a'
/// - From state 1 to state 0 on symbol 'b'
///
/// Further, state 0 should be initial and accepting, while state 1 is rejecting.
/// ```
/// use automata_minimizer::prelude::*;
///
/// let dfa = GraphBuilder::default()
///     .with_state_colors([true, false]) // colors given in the order of the states
///     .with_edges([(0, 'a', 0), (0, 'b', 1), (1, 'a', 1), (1, 'b', 0)])
///     .into_dfa(0) // 0 is the initial state
///     .unwrap();
/// assert!(dfa.accepts("abb".chars()));
/// ```
#[derive(Clone, Debug)]
pub struct GraphBuilder<Q = Void, L = char> {
    edges: Vec<(usize, L, usize)>,
    default: Option<Q>,
    colors: Vec<(usize, Q)>,
    states: usize,
}

impl<Q, L> Default for GraphBuilder<Q, L> {
    fn default() -> Self {
        Self {
            edges: vec![],
            default: None,
            colors: vec![],
            states: 0,
        }
    }
}

impl<L> GraphBuilder<Void, L> {
    /// Creates an empty instance of `Self`, where states are uncolored (have color [`Void`]).
    pub fn without_state_colors() -> Self {
        Self {
            default: Some(Void),
            ..Default::default()
        }
    }
}

impl<Q: Color, L: Color> GraphBuilder<Q, L> {
    /// Sets the default color for states that have no color specified.
    pub fn default_color(mut self, color: Q) -> Self {
        self.default = Some(color);
        self
    }

    /// Assigns `color` to `state`, overwriting previous assignments.
    pub fn color(mut self, state: usize, color: Q) -> Self {
        self.colors.push((state, color));
        self
    }

    /// Adds a list of colors to `self`. The colors are assigned to the states in the order in
    /// which they are given, so the colors `[true, false]` color state `0` with `true` and
    /// state `1` with `false`.
    pub fn with_state_colors<I: IntoIterator<Item = Q>>(self, iter: I) -> Self {
        iter.into_iter()
            .enumerate()
            .fold(self, |acc, (i, color)| acc.color(i, color))
    }

    /// Ensures that the built graph has at least `count` states, even if some of them do not
    /// appear on any edge.
    pub fn with_states(mut self, count: usize) -> Self {
        self.states = self.states.max(count);
        self
    }

    /// Adds the given edges, each given as a tuple `(source, label, target)`.
    pub fn with_edges<I: IntoIterator<Item = (usize, L, usize)>>(mut self, iter: I) -> Self {
        self.edges.extend(iter);
        self
    }

    fn state_count(&self) -> usize {
        let from_colors = self.colors.iter().map(|(q, _)| q + 1);
        let from_edges = self.edges.iter().map(|(p, _, q)| p.max(q) + 1);
        from_colors
            .chain(from_edges)
            .fold(self.states, usize::max)
    }

    /// Builds an [`EdgeLists`] from `self`. Fails if some state is neither colored explicitly
    /// nor covered by a default color.
    pub fn into_edge_lists(self) -> Result<EdgeLists<Q, L>, BuildError> {
        let count = self.state_count();
        let mut colors: Vec<Option<Q>> = vec![None; count];
        for (state, color) in self.colors {
            colors[state] = Some(color);
        }

        let mut ts = EdgeLists::with_capacity(count);
        for (state, color) in colors.into_iter().enumerate() {
            let color = color
                .or_else(|| self.default.clone())
                .ok_or(BuildError::MissingColor(state))?;
            ts.add_state(color);
        }
        for (source, label, target) in self.edges {
            let added = ts.add_edge(source, label, target);
            debug_assert!(added, "all mentioned states have been created");
        }
        Ok(ts)
    }

    /// Builds an [`Automaton`] with the given `initial` state.
    pub fn into_automaton(self, initial: usize) -> Result<Automaton<Q, L>, BuildError> {
        Automaton::new(self.into_edge_lists()?, initial)
    }

    /// Builds a [`MooreMachine`] with the given `initial` state, whose outputs are the colors
    /// of the states.
    pub fn into_moore(self, initial: usize) -> Result<MooreMachine<L, Q>, BuildError> {
        self.into_automaton(initial)
    }
}

impl<L: Color> GraphBuilder<bool, L> {
    /// Builds a [`DFA`] with the given `initial` state, where states colored `true` are
    /// accepting.
    pub fn into_dfa(self, initial: usize) -> Result<DFA<L>, BuildError> {
        self.into_automaton(initial)
    }
}

impl<Q: Color, S: Color, O: Color> GraphBuilder<Q, (S, O)> {
    /// Adds the given transitions, each given as a tuple `(source, symbol, output, target)`.
    /// The edges of the graph are labeled with the pair of symbol and output.
    pub fn with_transitions<I>(self, iter: I) -> Self
    where
        I: IntoIterator<Item = (usize, S, O, usize)>,
    {
        self.with_edges(
            iter.into_iter()
                .map(|(source, symbol, output, target)| (source, (symbol, output), target)),
        )
    }
}

impl<S: Color, O: Color> GraphBuilder<Void, (S, O)> {
    /// Builds a [`MealyMachine`] with the given `initial` state.
    pub fn into_mealy(self, initial: usize) -> Result<MealyMachine<S, O>, BuildError> {
        self.into_automaton(initial)
    }
}
