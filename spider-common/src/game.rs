use crate::board::Board;
use crate::config::EngineConfig;
use crate::deck::{Difficulty, build_deck, deal, shuffle};
use crate::history::History;
use crate::outcome::{Declined, Outcome};

use rand::{SeedableRng, rngs::StdRng};
use std::ops::Range;

/// A run picked up by the player and not dropped yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub pile: usize,
    pub start: usize,
}

/// One game session: the live board, the deal it started from and the undo
/// history.
///
/// Calls must be serialized by the caller; nothing here locks. Every
/// mutating call either applies completely or declines and leaves the board
/// as it was, and only applied calls are recorded for undo.
#[derive(Debug, Clone)]
pub struct Game {
    difficulty: Difficulty,
    config: EngineConfig,
    board: Board,
    initial_board: Board,
    history: History,
    selection: Option<Selection>,
    rng: StdRng,
}

impl Game {
    pub fn new(difficulty: Difficulty) -> Self {
        Self::with_config(difficulty, EngineConfig::default(), StdRng::from_os_rng())
    }

    pub fn new_seeded(difficulty: Difficulty, seed: u64) -> Self {
        Self::with_config(
            difficulty,
            EngineConfig::default(),
            StdRng::seed_from_u64(seed),
        )
    }

    pub fn with_config(difficulty: Difficulty, config: EngineConfig, rng: StdRng) -> Self {
        let mut game = Self {
            difficulty,
            config,
            board: Board::default(),
            initial_board: Board::default(),
            history: History::new(config.history_limit),
            selection: None,
            rng,
        };
        game.new_game(difficulty);
        game
    }

    /// Continues from an arbitrary board, which also becomes the restart
    /// point. `rng` deals any later new game.
    pub fn from_board(
        board: Board,
        difficulty: Difficulty,
        config: EngineConfig,
        rng: StdRng,
    ) -> Self {
        Self {
            difficulty,
            config,
            initial_board: board.clone(),
            board,
            history: History::new(config.history_limit),
            selection: None,
            rng,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn initial_board(&self) -> &Board {
        &self.initial_board
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    /// Builds, shuffles and deals a fresh game.
    pub fn new_game(&mut self, difficulty: Difficulty) -> &Board {
        let mut deck = build_deck(difficulty);
        shuffle(&mut deck, &mut self.rng);
        self.board = deal(deck, self.config.initial_score);
        self.initial_board = self.board.clone();
        self.difficulty = difficulty;
        self.history.clear();
        self.selection = None;
        log::info!("new {difficulty} game");
        &self.board
    }

    /// Goes back to the deal the current game started from.
    pub fn restart_current_level(&mut self) -> &Board {
        self.board = self.initial_board.clone();
        self.history.clear();
        self.selection = None;
        log::info!("restarted {} game", self.difficulty);
        &self.board
    }

    pub fn draggable_run(&self, pile_idx: usize) -> Range<usize> {
        self.board.draggable_run(pile_idx)
    }

    pub fn apply_move(&mut self, source: usize, start: usize, target: usize) -> Outcome {
        if let Err(reason) = self.board.check_move(source, start, target) {
            log::debug!("move {source}@{start} -> {target} declined: {reason}");
            return Outcome::Declined(reason);
        }
        self.history.push(&self.board);
        self.board.apply_move(source, start, target, &self.config)
    }

    pub fn reveal_card(&mut self, pile_idx: usize, card_idx: usize) -> Outcome {
        if let Err(reason) = self.board.check_reveal(pile_idx, card_idx) {
            log::debug!("reveal {pile_idx}@{card_idx} declined: {reason}");
            return Outcome::Declined(reason);
        }
        self.history.push(&self.board);
        self.board.reveal_card(pile_idx, card_idx)
    }

    pub fn deal_from_stock(&mut self) -> Outcome {
        if let Err(reason) = self.board.check_deal() {
            log::debug!("deal declined: {reason}");
            return Outcome::Declined(reason);
        }
        self.history.push(&self.board);
        self.board.deal_from_stock(&self.config)
    }

    /// Restores the board saved before the last applied operation and drops
    /// any pending selection.
    pub fn undo(&mut self) -> Outcome {
        self.selection = None;
        match self.history.pop() {
            Some(board) => {
                self.board = board;
                log::debug!("undo, {} step(s) left", self.history.len());
                Outcome::Applied
            }
            None => Outcome::Declined(Declined::NothingToUndo),
        }
    }

    /// Picks up the run starting at `start`, if it can move as a unit.
    pub fn select(&mut self, pile_idx: usize, start: usize) -> bool {
        self.selection = self
            .board
            .draggable_run(pile_idx)
            .contains(&start)
            .then_some(Selection {
                pile: pile_idx,
                start,
            });
        self.selection.is_some()
    }

    /// Drops the picked-up run on `target`. The selection is consumed either
    /// way.
    pub fn drop_selection(&mut self, target: usize) -> Outcome {
        match self.selection.take() {
            Some(Selection { pile, start }) => self.apply_move(pile, start, target),
            None => Outcome::Declined(Declined::NotMovable),
        }
    }
}
