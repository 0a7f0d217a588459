use tracing::debug;

use crate::prelude::*;

/// Uses a sprout-like algorithm to generate a random transition system over the given
/// `symbols`, in which every state is reachable from state `0`. `probability` determines the
/// probability of an edge back to some existing state being inserted. The algorithm is as
/// follows:
/// 1. Start with a single state.
/// 2. For each symbol, go through the existing states in order and with probability
///    `probability` add an edge to that state.
/// 3. If no edge to an existing state was added, insert an edge to a new state.
/// 4. Repeat until all states and symbols have been treated.
///
/// Note that the expected size of the result grows quickly as `probability` approaches `0`.
pub fn generate_random_ts<S: Color>(symbols: &[S], probability: f64) -> EdgeLists<Void, S> {
    let mut ts = EdgeLists::new();
    let mut current = ts.add_state(Void);

    while current < ts.size() {
        for symbol in symbols {
            let target = (0..=current)
                .find(|_| fastrand::f64() < probability)
                .unwrap_or_else(|| ts.add_state(Void));
            ts.add_edge(current, symbol.clone(), target);
        }
        current += 1;
    }
    debug!("sprouted random transition system with {} states", ts.size());
    ts
}

/// Generates a random transition system with `size` states (at least one), where every state
/// has exactly one edge for every symbol, leading to a uniformly chosen target. Depending on
/// the drawn edges, some states may be unreachable from state `0`.
pub fn generate_random_ts_sized<S: Color>(size: usize, symbols: &[S]) -> EdgeLists<Void, S> {
    generate_edges(size, symbols, 0.0, |_| Void)
}

/// Works as [`generate_random_ts_sized`], but returns a [`DFA`] with initial state `0`, whose
/// states are accepting with probability one half.
pub fn generate_random_dfa<S: Color>(size: usize, symbols: &[S]) -> DFA<S> {
    generate_random_partial_dfa(size, symbols, 0.0)
}

/// Works as [`generate_random_dfa`], but leaves out every transition with probability
/// `missing`, which results in a partial automaton.
pub fn generate_random_partial_dfa<S: Color>(
    size: usize,
    symbols: &[S],
    missing: f64,
) -> DFA<S> {
    let ts = generate_edges(size, symbols, missing, |_| fastrand::bool());
    Automaton::new(ts, 0).expect("random edges are drawn deterministically")
}

/// Generates a random, complete [`MealyMachine`] with `size` states, whose transitions emit
/// outputs drawn uniformly from `outputs`.
///
/// # Panics
///
/// Panics if `outputs` is empty.
pub fn generate_random_mealy<S: Color, O: Color>(
    size: usize,
    symbols: &[S],
    outputs: &[O],
) -> MealyMachine<S, O> {
    assert!(!outputs.is_empty(), "at least one output is needed");
    let count = size.max(1);
    let mut ts = EdgeLists::with_capacity(count);
    for _ in 0..count {
        ts.add_state(Void);
    }
    for state in 0..count {
        for symbol in symbols {
            let output = outputs[fastrand::usize(..outputs.len())].clone();
            ts.add_edge(state, (symbol.clone(), output), fastrand::usize(..count));
        }
    }
    Automaton::new(ts, 0).expect("random edges are drawn deterministically")
}

/// Generates a random word over `symbols`, whose length is drawn uniformly from
/// `min_len..=max_len`.
pub fn generate_random_word<S: Color>(symbols: &[S], min_len: usize, max_len: usize) -> Vec<S> {
    let length = fastrand::usize(min_len..=max_len);
    (0..length)
        .filter_map(|_| fastrand::choice(symbols).cloned())
        .collect()
}

fn generate_edges<Q, S, F>(
    size: usize,
    symbols: &[S],
    missing: f64,
    mut color: F,
) -> EdgeLists<Q, S>
where
    Q: Color,
    S: Color,
    F: FnMut(usize) -> Q,
{
    let count = size.max(1);
    let mut ts = EdgeLists::with_capacity(count);
    for state in 0..count {
        ts.add_state(color(state));
    }
    for state in 0..count {
        for symbol in symbols {
            if missing > 0.0 && fastrand::f64() < missing {
                continue;
            }
            ts.add_edge(state, symbol.clone(), fastrand::usize(..count));
        }
    }
    ts
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;

    use super::*;

    #[test]
    fn sprouted_ts_is_reachable_and_complete() {
        fastrand::seed(7);
        for _ in 0..20 {
            let ts = generate_random_ts(&['a', 'b'], 0.4);
            assert_eq!(ts.reachable_from([0]).count(), ts.size());
            assert_eq!(ts.edge_count(), 2 * ts.size());
            assert!(ts.is_deterministic());
        }
    }

    #[test]
    fn sized_generation() {
        let ts = generate_random_ts_sized(10, &[0u8, 1, 2]);
        assert_eq!(ts.size(), 10);
        assert_eq!(ts.edge_count(), 30);
        assert!(ts.is_deterministic());

        let dfa = generate_random_dfa(0, &['a']);
        assert_eq!(dfa.size(), 1);

        let partial = generate_random_partial_dfa(50, &['a', 'b'], 1.0);
        assert_eq!(partial.ts().edge_count(), 0);
        assert_eq!(partial.minimize().size(), 1);
    }

    #[test]
    fn random_mealy_is_complete() {
        let mealy = generate_random_mealy(8, &['a', 'b'], &[0u8, 1]);
        assert_eq!(mealy.size(), 8);
        let word = generate_random_word(&['a', 'b'], 3, 10);
        assert!((3..=10).contains(&word.len()));
        assert_eq!(
            mealy.transduce(word.iter().copied()).map(|o| o.len()),
            Some(word.len())
        );
        assert!(mealy.minimize().equivalent(&mealy));
    }
}
