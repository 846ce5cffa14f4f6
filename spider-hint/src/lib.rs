//! A greedy hint engine for Spider Solitaire.
//!
//! Every call enumerates the legal moves of the board it is given, scores
//! each with a fixed set of weights and returns the best one. Nothing is
//! cached between calls and the board is never mutated.
mod hint;
mod move_;

pub use crate::hint::{Hint, LegalMoves, compute_hint, legal_moves};
pub use crate::move_::HintMove;
