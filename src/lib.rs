//! Library for minimizing (possibly incomplete) labeled transition systems in Rust.
//!
//! The central piece of this crate is a generic partition refinement procedure following the
//! approach of Béal and Crochemore for minimizing incomplete automata. It operates on anything
//! implementing the [`Graph`] trait, which is simply a finite collection of nodes connected by
//! labeled directed edges, where every node carries a color. Starting from a classification of the
//! nodes (by default their color), the refinement computes the coarsest partition of the nodes into
//! blocks such that two nodes in the same block agree on their classification and, for every label,
//! can reach the same blocks. Undefined transitions are preserved: a node without an outgoing edge
//! for some label is never merged with a node that has one.
//!
//! The result of a minimization is a [`MinimizationResult`], which gives access to the blocks
//! and can be turned into a [`minimization::BlockAutomaton`], the quotient of the input by the
//! computed partition. As the quotient is itself a [`Graph`], it can be collected into an
//! [`graph::EdgeLists`] or minimized again.
//!
//! On top of that, the crate provides thin wrappers for deterministic automata, see
//! [`automaton::DFA`], [`automaton::MooreMachine`] and [`automaton::MealyMachine`], each of which
//! can be minimized directly.
//!
//! ```
//! use automata_minimizer::prelude::*;
//!
//! let dfa = GraphBuilder::default()
//!     .with_state_colors([false, false, true])
//!     .with_edges([(0, 'a', 1), (1, 'a', 2), (2, 'a', 2), (0, 'b', 2), (1, 'b', 2), (2, 'b', 2)])
//!     .into_dfa(0)
//!     .unwrap();
//! assert_eq!(dfa.minimize().size(), 3);
//! ```
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

/// The prelude is supposed to make using this package easier. Including everything, i.e.
/// `use automata_minimizer::prelude::*;` should be enough to use the package.
pub mod prelude {
    #[cfg(feature = "random")]
    pub use super::random;
    pub use super::{
        automaton::{Automaton, MealyMachine, MooreMachine, DFA},
        graph::{
            BuildError, EdgeLists, EdgeReference, Graph, GraphBuilder, IndexType, IsEdge,
            ReachableNodes,
        },
        math,
        minimization::{
            minimize, minimize_from, Block, BlockAutomaton, BlockEdge, BlockId, BlockMap,
            MinimizationResult, Minimizer,
        },
        Color, Void,
    };
}

/// This module contains some definitions of mathematical objects which are used throughout the
/// crate and do not really fit to the top level.
pub mod math;

/// Defines the [`Graph`] abstraction which the minimization operates on, together with a
/// vector backed implementation and a builder for it.
pub mod graph;
pub use graph::Graph;

/// Defines deterministic automata built on top of [`graph::EdgeLists`], all of which can be
/// minimized.
#[allow(clippy::upper_case_acronyms)]
pub mod automaton;

/// Partition refinement in the style of Béal and Crochemore, the quotient view on its result and
/// everything in between.
pub mod minimization;
pub use minimization::{minimize, minimize_from, MinimizationResult};

/// Implements the generation of random automata.
#[cfg(feature = "random")]
pub mod random;

use std::{fmt::Debug, hash::Hash};

/// A color is simply a type that can be used to color states or label edges. Minimization only
/// relies on colors being comparable for equality and hashable, where the two have to be
/// consistent with each other.
pub trait Color: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> Color for T {}

/// Represents the absence of a color. This is used for example for the states of a
/// [`automaton::MealyMachine`], where all information sits on the edges.
#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Void;

impl Debug for Void {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#")
    }
}
