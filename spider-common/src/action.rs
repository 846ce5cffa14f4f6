use crate::board::{Board, TOTAL_PILES};
use crate::game::Game;
use crate::outcome::{Declined, Outcome};

use anyhow::{Context, Result, bail};
use std::fmt;

/// A player action in text notation. Pile numbers are zero-based here and
/// one-based in text: `P1:P3@4` moves the top four cards of pile 1 onto
/// pile 3, `F2` turns over the top of pile 2, `D` deals, `U` undoes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Move {
        from: usize,
        to: usize,
        count: usize,
    },
    Reveal(usize),
    Deal,
    Undo,
}

impl Action {
    pub fn is_deal(&self) -> bool {
        matches!(self, Action::Deal)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Move { from, to, count } => {
                write!(f, "P{}:P{}", from + 1, to + 1)?;
                if *count > 1 {
                    write!(f, "@{count}")?;
                }
                Ok(())
            }
            Action::Reveal(idx) => write!(f, "F{}", idx + 1),
            Action::Deal => f.write_str("D"),
            Action::Undo => f.write_str("U"),
        }
    }
}

pub fn parse_action(s: &str) -> Result<Action> {
    let s = s.trim();
    let part_ctx = || format!("Failed to parse action '{s}'");
    match s.to_ascii_uppercase().as_str() {
        "D" => return Ok(Action::Deal),
        "U" => return Ok(Action::Undo),
        _ => {}
    }
    if let Some((from_str, to_part)) = s.split_once(':') {
        let from = parse_pile(from_str).with_context(part_ctx)?;
        let (to_str, count) = match to_part.split_once('@') {
            Some((to_s, count_s)) => (to_s, count_s.parse::<usize>().with_context(part_ctx)?),
            None => (to_part, 1),
        };
        let to = parse_pile(to_str).with_context(part_ctx)?;
        if count == 0 {
            bail!("Move count must be at least 1 in '{s}'");
        }
        Ok(Action::Move { from, to, count })
    } else if let Some(rest) = s.strip_prefix(['F', 'f']) {
        Ok(Action::Reveal(parse_pile_number(rest).with_context(part_ctx)?))
    } else {
        bail!("Unknown action format: {s}")
    }
}

/// Parses whitespace separated actions; `3D` stands for three deals.
pub fn parse_actions(s: &str) -> Result<Vec<Action>> {
    let mut actions = Vec::new();
    for part in s.split_whitespace() {
        if let Some(num_str) = part.strip_suffix(['D', 'd'])
            && !num_str.is_empty()
        {
            let num = num_str
                .parse::<usize>()
                .with_context(|| format!("Failed to parse action '{part}'"))?;
            actions.extend(std::iter::repeat_n(Action::Deal, num));
        } else {
            actions.push(parse_action(part)?);
        }
    }
    Ok(actions)
}

fn parse_pile(s: &str) -> Result<usize> {
    match s.trim().strip_prefix(['P', 'p']) {
        Some(rest) => parse_pile_number(rest),
        None => bail!("Invalid pile identifier: {s}"),
    }
}

fn parse_pile_number(s: &str) -> Result<usize> {
    let num = s
        .trim()
        .parse::<usize>()
        .with_context(|| format!("Invalid pile number: {s}"))?;
    if !(1..=TOTAL_PILES).contains(&num) {
        bail!("Pile number {num} out of range 1-{TOTAL_PILES}");
    }
    Ok(num - 1)
}

pub fn format_actions(actions: &[Action]) -> String {
    let mut list = vec![];
    let mut i = 0;
    while i < actions.len() {
        if actions[i].is_deal() {
            let count = actions[i..].iter().take_while(|a| a.is_deal()).count();
            list.push(if count == 1 {
                "D".to_string()
            } else {
                format!("{count}D")
            });
            i += count;
            continue;
        }
        list.push(actions[i].to_string());
        i += 1;
    }

    let mut output = String::new();
    let max_width = list.iter().map(|s| s.len()).max().unwrap_or_default() + 1;
    for chunk in list.chunks(10) {
        for cmd in chunk {
            output.push_str(&format!("{cmd:<width$}", width = max_width));
        }
        output.push('\n');
    }

    output
}

pub fn apply_action(game: &mut Game, action: &Action) -> Outcome {
    match *action {
        Action::Move { from, to, count } => {
            let Some(pile) = game.board().pile(from) else {
                return Outcome::Declined(Declined::NoSuchPile);
            };
            match pile.len().checked_sub(count) {
                Some(start) => game.apply_move(from, start, to),
                None => Outcome::Declined(Declined::NotMovable),
            }
        }
        Action::Reveal(idx) => {
            let top = game
                .board()
                .pile(idx)
                .map(|pile| pile.len().saturating_sub(1))
                .unwrap_or_default();
            game.reveal_card(idx, top)
        }
        Action::Deal => game.deal_from_stock(),
        Action::Undo => game.undo(),
    }
}

pub fn describe_action(board: &Board, action: &Action) -> String {
    let top_of = |idx: usize| -> String {
        board
            .pile(idx)
            .and_then(|p| p.peek_top())
            .map(|c| c.pretty_print())
            .unwrap_or_else(|| "empty".to_string())
    };

    match *action {
        Action::Move { from, to, count } => {
            let from_cards = board
                .pile(from)
                .map(|p| {
                    let cards = p.cards();
                    cards[cards.len().saturating_sub(count)..]
                        .iter()
                        .map(|c| c.pretty_print())
                        .collect::<Vec<_>>()
                        .join("")
                })
                .unwrap_or_default();
            format!("(Pile{}) {from_cards} -> (Pile{}) {}", from + 1, to + 1, top_of(to))
        }
        Action::Reveal(idx) => format!("Turn over the top card of Pile{}", idx + 1),
        Action::Deal => format!("Deal from stock ({} left)", board.stock().len()),
        Action::Undo => "Undo".to_string(),
    }
}
