use tracing::debug;

use crate::{
    graph::{unknown_node, BuildError, EdgeLists},
    math::Set,
    minimization, Color, Graph, Void,
};

/// A deterministic, possibly partial automaton, consisting of an [`EdgeLists`] in which no state
/// has two outgoing edges with the same label, together with a designated initial state.
///
/// What the automaton computes depends on where the information sits: a [`DFA`] colors its
/// states with `bool`, a [`MooreMachine`] with arbitrary outputs, and a [`MealyMachine`]
/// leaves the states uncolored and labels its edges with pairs of input symbol and output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Automaton<Q, L> {
    ts: EdgeLists<Q, L>,
    initial: usize,
}

/// A deterministic finite automaton over symbols of type `S`. Accepting states are colored
/// `true`.
pub type DFA<S = char> = Automaton<bool, S>;

/// A Moore machine which reads symbols of type `S` and emits the color of type `Q` of the
/// state it reaches.
pub type MooreMachine<S = char, Q = usize> = Automaton<Q, S>;

/// A Mealy machine which reads symbols of type `S` and emits an output of type `O` on every
/// transition.
pub type MealyMachine<S = char, O = usize> = Automaton<Void, (S, O)>;

impl<Q: Color, L: Color> Automaton<Q, L> {
    /// Creates a new automaton with the given transition system and initial state. Fails if
    /// `initial` is not a state of `ts` or if `ts` is not deterministic.
    pub fn new(ts: EdgeLists<Q, L>, initial: usize) -> Result<Self, BuildError> {
        if initial >= ts.size() {
            return Err(BuildError::UnknownInitial(initial));
        }
        if let Some(state) = ts.find_nondeterministic_state() {
            return Err(BuildError::Nondeterministic(state));
        }
        Ok(Self { ts, initial })
    }

    /// Gives a reference to the underlying transition system.
    pub fn ts(&self) -> &EdgeLists<Q, L> {
        &self.ts
    }

    /// Consumes `self` and returns the underlying transition system.
    pub fn into_ts(self) -> EdgeLists<Q, L> {
        self.ts
    }

    /// The initial state.
    pub fn initial(&self) -> usize {
        self.initial
    }

    /// The number of states.
    pub fn size(&self) -> usize {
        self.ts.size()
    }

    /// Follows the edges labeled with the symbols of `word`, starting in the initial state.
    /// Returns `None` as soon as a transition is missing.
    pub fn reached<W: IntoIterator<Item = L>>(&self, word: W) -> Option<usize> {
        word.into_iter()
            .try_fold(self.initial, |state, symbol| self.ts.successor(state, &symbol))
    }

    /// Returns the color of the state that is reached by `word`, if there is such a state.
    pub fn output<W: IntoIterator<Item = L>>(&self, word: W) -> Option<Q> {
        self.reached(word).and_then(|state| self.ts.state_color(state))
    }

    /// Computes the minimal automaton that is equivalent to `self`.
    ///
    /// States that cannot be reached from the initial state are dropped, the remaining ones are
    /// merged exactly when they have the same color and agree on which transitions are defined
    /// and where those lead. Missing transitions are kept as they are, so the result is partial
    /// whenever `self` is.
    pub fn minimize(&self) -> Self {
        let result = minimization::minimize_from(
            &self.ts,
            |state| self.ts.state_color(state),
            [self.initial],
        );
        let initial = result
            .block_of(self.initial)
            .unwrap_or_else(|| unknown_node(self.initial));
        let ts = result
            .quotient(|state| {
                self.ts
                    .state_color(state)
                    .unwrap_or_else(|| unknown_node(state))
            })
            .collect_edge_lists();
        debug!("minimized automaton from {} to {} states", self.size(), ts.size());
        Self { ts, initial }
    }

    /// Checks whether `self` and `other` are equivalent, meaning that for every word either both
    /// have no run on it or both reach states of the same color. Runs are compared label by label,
    /// so for Mealy machines this also compares all outputs.
    pub fn equivalent(&self, other: &Self) -> bool {
        let mut seen = Set::default();
        let mut stack = vec![(self.initial, other.initial)];
        seen.insert((self.initial, other.initial));

        while let Some((left, right)) = stack.pop() {
            let (Some(left_state), Some(right_state)) =
                (self.ts.state(left), other.ts.state(right))
            else {
                return false;
            };
            if left_state.color() != right_state.color()
                || left_state.edges().len() != right_state.edges().len()
            {
                return false;
            }
            for (label, target) in left_state.edges() {
                let Some(other_target) = other.ts.successor(right, label) else {
                    return false;
                };
                if seen.insert((*target, other_target)) {
                    stack.push((*target, other_target));
                }
            }
        }
        true
    }
}

impl<S: Color> DFA<S> {
    /// Returns `true` iff running on `word` is possible and ends in an accepting state.
    pub fn accepts<W: IntoIterator<Item = S>>(&self, word: W) -> bool {
        self.output(word).unwrap_or(false)
    }
}

impl<S: Color, O: Color> MealyMachine<S, O> {
    /// Reads `word` and collects the outputs of all transitions that are taken. Returns `None`
    /// if a transition is missing along the way.
    pub fn transduce<W: IntoIterator<Item = S>>(&self, word: W) -> Option<Vec<O>> {
        let mut state = self.initial;
        let mut outputs = vec![];
        for symbol in word {
            let ((_, output), target) = self
                .ts
                .successor_by(state, |(input, _)| input == &symbol)?;
            outputs.push(output.clone());
            state = target;
        }
        Some(outputs)
    }
}
