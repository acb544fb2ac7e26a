//! # fastoil: Order Independent Language induction
//!
//! A grammatical inference library learning a nondeterministic finite automaton (NFA) from
//! positive and negative symbol sequences with the OIL state-merging algorithm.
//!
//! Automata are stored as bit matrices: for each state and symbol, the set of successors and
//! the set of predecessors are bit vectors over all states. Matching advances the whole set of
//! current states at once, and merging two states is a handful of row unions.
//!
//! ## Examples
//!
//! ```
//! use fastoil::{OilTrainer, SampleSet};
//! use rand::SeedableRng;
//!
//! // Sequences over {0, 1} ending with 1.
//! let mut samples: SampleSet = "8 2
//! 1 1 1
//! 1 2 0 1
//! 1 2 1 1
//! 1 3 0 0 1
//! 0 1 0
//! 0 2 1 0
//! 0 2 0 0
//! 0 0
//! ".parse().unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let nfa = OilTrainer::new().train(&mut samples, &mut rng).unwrap();
//!
//! for sample in samples.positives() {
//!     assert!(nfa.is_match(sample));
//! }
//! for sample in samples.negatives() {
//!     assert!(!nfa.is_match(sample));
//! }
//! ```

pub mod errors;
mod matrix;
pub mod model;
pub mod nfa;
pub mod report;
pub mod samples;
pub mod state_set;
pub mod trainer;
mod utils;


pub use nfa::{Nfa, MAX_MATRIX_BYTES, MAX_STATES};
pub use samples::{Label, SampleSet};
pub use state_set::StateSet;
pub use trainer::{OilTrainer, Step, TrainingSession};

/// Index of a state slot.
pub type StateId = usize;

/// A symbol of the alphabet, in `0..alphabet_size`.
pub type Symbol = u32;

/// A sequence of symbols.
pub type Sample = Vec<Symbol>;
