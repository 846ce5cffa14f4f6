mod utils;

use crate::utils::*;

use anyhow::Result;
use clap::Parser;
use spider_common::{Difficulty, Game};
use spider_hint::{Hint, compute_hint, legal_moves};

use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Seed for dealing a new game (random if omitted)
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
    /// Number of suits in a new game
    #[arg(short, long, value_enum, default_value_t = Level::Advanced)]
    level: Level,
    /// List every legal move with its score
    #[arg(short, long)]
    all: bool,
    /// Path to a game state file
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logger();
    let Cli {
        seed,
        level,
        all,
        file,
    } = Cli::parse();

    let board = match load_board(file, true)? {
        Some(board) => board,
        None => {
            let seed = seed.unwrap_or_else(rand::random);
            let difficulty = Difficulty::from(level);
            println!("Dealt {difficulty} game, seed {seed}\n");
            Game::new_seeded(difficulty, seed).board().clone()
        }
    };
    print_board(&board);
    println!();

    if all {
        for mov in legal_moves(&board) {
            println!("{:>4}  {}", mov.score, mov.to_action());
        }
        println!();
    }

    let hint = compute_hint(&board);
    println!("{}", hint.describe(&board));
    if let Hint::Move(mov) = hint {
        println!("{}", mov.to_action());
    }

    Ok(())
}
