use crate::card::{Card, parse_cards};
use crate::deck::DECK_SIZE;

use anyhow::{Context, Result, bail};
use smallvec::SmallVec;

pub const TOTAL_PILES: usize = 8;
pub const TOTAL_SETS: u8 = 8;
pub const SET_SIZE: usize = 13;
/// Cards left in the stock after the opening deal: 104 - 44, or seven full
/// deals and one of four cards.
pub const STOCK_SIZE: usize = 60;
const STOCK_CAPACITY: usize = 64;
const PILE_SIZE: usize = 24;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    pub(crate) piles: [Pile; TOTAL_PILES],
    pub(crate) stock: SmallVec<[Card; STOCK_CAPACITY]>,
    pub(crate) score: u32,
    pub(crate) completed_sets: u8,
    pub(crate) won: bool,
}

impl Board {
    pub fn new(piles: [Pile; TOTAL_PILES], stock: Vec<Card>, score: u32) -> Self {
        Self {
            piles,
            stock: stock.into_iter().collect(),
            score,
            completed_sets: 0,
            won: false,
        }
    }

    pub fn piles(&self) -> &[Pile; TOTAL_PILES] {
        &self.piles
    }

    pub fn pile(&self, idx: usize) -> Option<&Pile> {
        self.piles.get(idx)
    }

    /// Stock cards, bottom first; deals take from the end.
    pub fn stock(&self) -> &[Card] {
        &self.stock
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn completed_sets(&self) -> u8 {
        self.completed_sets
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn deals_remaining(&self) -> usize {
        self.stock.len().div_ceil(TOTAL_PILES)
    }

    pub fn has_empty_pile(&self) -> bool {
        self.piles.iter().any(Pile::is_empty)
    }

    /// Cards still in play plus the ones retired in completed sets.
    pub fn card_count(&self) -> usize {
        self.piles.iter().map(Pile::len).sum::<usize>()
            + self.stock.len()
            + self.completed_sets as usize * SET_SIZE
    }

    pub fn is_valid(&self) -> bool {
        self.card_count() == DECK_SIZE
            && self.completed_sets <= TOTAL_SETS
            && self.won == (self.completed_sets >= TOTAL_SETS)
            && self.piles.iter().all(|p| p.face_up_count <= p.len())
    }

    pub fn parse(content: &str) -> Result<Self> {
        let mut board: Self = Default::default();

        for line in content
            .split('\n')
            .map(|v| v.trim())
            .filter(|l| !l.is_empty())
        {
            let line_context = || format!("Failed to parse at '{line}'");
            if let Some(rest) = line.strip_prefix("Stock:") {
                board.stock = parse_cards(rest.trim())
                    .with_context(line_context)?
                    .into_iter()
                    .collect();
            } else if let Some(rest) = line.strip_prefix("Pile") {
                let mut parts = rest.splitn(2, ':');
                let idx = parts
                    .next()
                    .unwrap_or("")
                    .trim()
                    .parse::<usize>()
                    .context("Invalid pile index")
                    .with_context(line_context)?;
                if !(1..=TOTAL_PILES).contains(&idx) {
                    bail!("Pile index {idx} out of range in '{line}'");
                }
                let cards_str = parts.next().unwrap_or("").trim();
                let (before, after) = match cards_str.find('|') {
                    Some(split_idx) => {
                        let (b, a) = cards_str.split_at(split_idx);
                        (b, &a[1..])
                    }
                    None => (cards_str, ""),
                };
                let face_down = parse_cards(before.trim()).with_context(line_context)?;
                let face_up = parse_cards(after.trim()).with_context(line_context)?;
                let face_up_count = face_up.len();
                board.piles[idx - 1] = Pile::new([face_down, face_up].concat(), face_up_count);
            } else if let Some(rest) = line.strip_prefix("Score:") {
                board.score = rest
                    .trim()
                    .parse()
                    .context("Invalid score")
                    .with_context(line_context)?;
            } else if let Some(rest) = line.strip_prefix("Completed:") {
                let sets: u8 = rest
                    .trim()
                    .parse()
                    .context("Invalid completed set count")
                    .with_context(line_context)?;
                if sets > TOTAL_SETS {
                    bail!("At most {TOTAL_SETS} sets can be completed, got {sets}");
                }
                board.completed_sets = sets;
            } else {
                bail!("Unrecognized line '{line}'");
            }
        }
        board.won = board.completed_sets >= TOTAL_SETS;

        Ok(board)
    }

    pub fn pretty_print(&self) -> String {
        let mut output = String::new();

        if !self.stock.is_empty() {
            output.push_str("Stock: ");
            for card in &self.stock {
                output.push_str(&card.pretty_print());
            }
            output.push('\n');
        }

        for (i, pile) in self.piles.iter().enumerate() {
            if pile.is_empty() {
                continue;
            }
            output.push_str(&format!("Pile{}: ", i + 1));
            let sep = pile.first_face_up();
            for (j, card) in pile.cards.iter().enumerate() {
                if j == sep {
                    output.push('|');
                }
                output.push_str(&card.pretty_print());
            }
            if sep == pile.len() {
                output.push('|');
            }
            output.push('\n');
        }

        output.push_str(&format!("Score: {}\n", self.score));
        output.push_str(&format!("Completed: {}", self.completed_sets));

        output
    }
}

/// A tableau pile, bottom card first.
///
/// Face-up cards always form a suffix of the pile, so the face state of the
/// whole pile is a single count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pile {
    pub(crate) cards: SmallVec<[Card; PILE_SIZE]>,
    pub(crate) face_up_count: usize,
}

impl Pile {
    pub fn new(cards: Vec<Card>, face_up_count: usize) -> Self {
        let face_up_count = face_up_count.min(cards.len());
        Self {
            cards: cards.into_iter().collect(),
            face_up_count,
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn peek_top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn face_up_count(&self) -> usize {
        self.face_up_count
    }

    /// Index of the lowest face-up card, or `len()` when none is showing.
    pub fn first_face_up(&self) -> usize {
        self.cards.len() - self.face_up_count
    }

    pub fn is_face_up(&self, idx: usize) -> bool {
        idx < self.cards.len() && idx >= self.first_face_up()
    }

    pub fn top_is_face_down(&self) -> bool {
        !self.cards.is_empty() && self.face_up_count == 0
    }

    pub(crate) fn push_face_up(&mut self, card: Card) {
        self.cards.push(card);
        self.face_up_count += 1;
    }

    pub(crate) fn extend_face_up(&mut self, cards: impl IntoIterator<Item = Card>) {
        let before = self.cards.len();
        self.cards.extend(cards);
        self.face_up_count += self.cards.len() - before;
    }

    /// Removes every card from `start` upward.
    pub(crate) fn split_off(&mut self, start: usize) -> SmallVec<[Card; PILE_SIZE]> {
        let removed: SmallVec<[Card; PILE_SIZE]> = self.cards.drain(start..).collect();
        self.face_up_count = self.face_up_count.saturating_sub(removed.len());
        removed
    }

    /// Turns the top card face up if it is face down.
    pub(crate) fn flip_top(&mut self) -> bool {
        if self.top_is_face_down() {
            self.face_up_count = 1;
            true
        } else {
            false
        }
    }
}
