use anyhow::{Context, Result};
use clap::ValueEnum;
use spider_common::{Difficulty, board::Board};

use std::{
    io::{IsTerminal, Read, stdin},
    path::{Path, PathBuf},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Level {
    /// One suit
    Beginner,
    /// Two suits
    Intermediate,
    /// Four suits
    #[default]
    Advanced,
}

impl From<Level> for Difficulty {
    fn from(level: Level) -> Self {
        match level {
            Level::Beginner => Difficulty::Beginner,
            Level::Intermediate => Difficulty::Intermediate,
            Level::Advanced => Difficulty::Advanced,
        }
    }
}

/// Logs go to stderr, filtered by `RUST_LOG` (warnings only by default).
pub fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

/// Reads a board from `file`, or from stdin when `piped` allows it and stdin
/// is not a terminal. `None` means there was nothing to load and a new game
/// should be dealt.
pub fn load_board(file: Option<PathBuf>, piped: bool) -> Result<Option<Board>> {
    if let Some(file) = file {
        return read_board_file(&file).map(Some);
    }
    if !piped || stdin().is_terminal() {
        return Ok(None);
    }
    let mut content = String::new();
    stdin()
        .read_to_string(&mut content)
        .context("Failed to read from stdin")?;
    parse_board(&content).map(Some)
}

fn read_board_file(file: &Path) -> Result<Board> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read '{}'", file.display()))?;
    parse_board(&content)
}

fn parse_board(content: &str) -> Result<Board> {
    let board = Board::parse(content).context("Failed to parse board")?;
    if !board.is_valid() {
        log::warn!("loaded board does not hold 104 cards");
    }
    Ok(board)
}

pub fn print_board(board: &Board) {
    println!("{}", board.pretty_print());
    let deals = board.deals_remaining();
    println!("Deals left: {deals}");
    if board.is_won() {
        println!("✓ All sets completed!");
    }
}
