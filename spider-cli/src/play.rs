mod utils;

use crate::utils::*;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};
use spider_common::{
    Difficulty, EngineConfig, Game, Outcome,
    action::{Action, apply_action, format_actions, parse_actions},
    board::TOTAL_PILES,
};
use spider_hint::{Hint, compute_hint};

use std::{
    io::{BufRead, Write, stdin, stdout},
    path::PathBuf,
};

const HELP: &str = r#"Commands:
  P1:P3       move the movable top card of pile 1 onto pile 3
  P1:P3@4     move the top 4 cards of pile 1 onto pile 3
  F2          turn over the face-down top card of pile 2
  D / 3D      deal from the stock (once / three times)
  U           undo
  s 1 4       pick up the top 4 cards of pile 1
  t 3         drop the picked-up cards on pile 3
  h           show a hint
  l           list the actions played so far
  r           restart the current deal
  n [level]   new game (beginner, intermediate, advanced)
  q           quit
  ?           this help"#;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Seed for dealing (random if omitted)
    #[arg(short, long, value_name = "SEED")]
    seed: Option<u64>,
    /// Number of suits
    #[arg(short, long, value_enum, default_value_t = Level::Advanced)]
    level: Level,
    /// How many moves can be undone
    #[arg(short, long, default_value_t = 20, value_name = "NUM")]
    undo_limit: usize,
    /// Path to a game state file to continue from
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logger();
    let Cli {
        seed,
        level,
        undo_limit,
        file,
    } = Cli::parse();

    let config = EngineConfig {
        history_limit: undo_limit,
        ..Default::default()
    };
    let difficulty = Difficulty::from(level);
    let seed = seed.unwrap_or_else(rand::random);
    println!("Seed: {seed}");
    let rng = StdRng::seed_from_u64(seed);
    let game = match load_board(file, false)? {
        Some(board) => Game::from_board(board, difficulty, config, rng),
        None => Game::with_config(difficulty, config, rng),
    };

    Session::new(game).run()
}

struct Session {
    game: Game,
    played: Vec<Action>,
}

impl Session {
    fn new(game: Game) -> Self {
        Self {
            game,
            played: vec![],
        }
    }

    fn run(&mut self) -> Result<()> {
        println!("{HELP}\n");
        print_board(self.game.board());

        let mut lines = stdin().lock().lines();
        loop {
            print!("> ");
            stdout().flush()?;
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read from stdin")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line == "q" {
                break;
            }
            match self.handle(line) {
                Ok(true) => print_board(self.game.board()),
                Ok(false) => {}
                Err(err) => println!("{err:#}"),
            }
        }
        Ok(())
    }

    /// Runs one command line. Returns whether the board should be shown.
    fn handle(&mut self, line: &str) -> Result<bool> {
        let mut words = line.split_whitespace();
        let command = words.next().unwrap_or_default();
        match command {
            "?" => println!("{HELP}"),
            "h" => {
                let board = self.game.board();
                let hint = compute_hint(board);
                println!("Hint: {}", hint.describe(board));
                if let Hint::Move(mov) = hint {
                    println!("      {}", mov.to_action());
                }
            }
            "l" => print!("{}", format_actions(&self.played)),
            "r" => {
                self.game.restart_current_level();
                self.played.clear();
                return Ok(true);
            }
            "n" => {
                let difficulty = match words.next() {
                    Some(name) => name.parse()?,
                    None => self.game.difficulty(),
                };
                self.game.new_game(difficulty);
                self.played.clear();
                println!("New {difficulty} game");
                return Ok(true);
            }
            "s" => {
                let pile = pile_arg(words.next())?;
                let count: usize = match words.next() {
                    Some(n) => n.parse().with_context(|| format!("Invalid count '{n}'"))?,
                    None => 1,
                };
                let len = self.game.board().pile(pile).map_or(0, |p| p.len());
                let picked = len
                    .checked_sub(count)
                    .is_some_and(|start| self.game.select(pile, start));
                if picked {
                    println!("Picked up {count} card(s) from Pile{}", pile + 1);
                } else {
                    println!("Those cards do not form a movable run");
                }
            }
            "t" => {
                let target = pile_arg(words.next())?;
                let Some(selection) = self.game.selection() else {
                    bail!("Nothing picked up, use `s` first");
                };
                let count = self
                    .game
                    .board()
                    .pile(selection.pile)
                    .map_or(0, |p| p.len().saturating_sub(selection.start));
                let outcome = self.game.drop_selection(target);
                let action = Action::Move {
                    from: selection.pile,
                    to: target,
                    count,
                };
                return Ok(self.record(action, outcome));
            }
            _ => {
                let mut changed = false;
                for action in parse_actions(line)? {
                    let outcome = apply_action(&mut self.game, &action);
                    let applied = self.record(action, outcome);
                    changed |= applied;
                    if !applied {
                        break;
                    }
                }
                return Ok(changed);
            }
        }
        Ok(false)
    }

    fn record(&mut self, action: Action, outcome: Outcome) -> bool {
        match outcome {
            Outcome::Applied => {
                if self.game.board().is_won() {
                    println!("You won with a score of {}", self.game.board().score());
                }
                self.played.push(action);
                true
            }
            Outcome::Declined(reason) => {
                println!("{action}: {reason}");
                false
            }
        }
    }
}

fn pile_arg(arg: Option<&str>) -> Result<usize> {
    let Some(arg) = arg else {
        bail!("Missing pile number");
    };
    let num: usize = arg
        .trim_start_matches(['P', 'p'])
        .parse()
        .with_context(|| format!("Invalid pile number '{arg}'"))?;
    if !(1..=TOTAL_PILES).contains(&num) {
        bail!("Pile number {num} out of range 1-{TOTAL_PILES}");
    }
    Ok(num - 1)
}
