//! Cards, board state and the move rules of Spider Solitaire.
//!
//! [`game::Game`] is the entry point for play: it owns the board, deals new
//! games and keeps the undo history. The board and rule functions can also be
//! used on their own, e.g. to inspect a position loaded with
//! [`board::Board::parse`].
pub mod action;
pub mod board;
pub mod card;
pub mod config;
pub mod deck;
pub mod game;
pub mod history;
pub mod outcome;
pub mod rules;

pub use crate::config::EngineConfig;
pub use crate::deck::Difficulty;
pub use crate::game::Game;
pub use crate::outcome::{Declined, Outcome};
