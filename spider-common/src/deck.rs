use crate::board::{Board, Pile, TOTAL_PILES};
use crate::card::{Card, MAX_RANK, Suit};

use anyhow::{Result, bail};
use rand::Rng;
use std::{fmt, str::FromStr};

pub const DECK_SIZE: usize = 104;
/// Cards dealt to each pile at the start; the last one lands face up.
pub const PILE_SIZES: [usize; TOTAL_PILES] = [6, 6, 6, 6, 5, 5, 5, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    #[default]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    pub fn suits(self) -> &'static [Suit] {
        match self {
            Difficulty::Beginner => &[Suit::Spades],
            Difficulty::Intermediate => &[Suit::Spades, Suit::Hearts],
            Difficulty::Advanced => &Suit::ALL,
        }
    }

    pub fn suit_count(self) -> usize {
        self.suits().len()
    }

    pub fn name(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }

    /// Lenient lookup: anything unrecognised plays the four-suit game.
    pub fn from_name_or_default(name: &str) -> Self {
        name.parse().unwrap_or_default()
    }
}

impl FromStr for Difficulty {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" | "1" => Ok(Difficulty::Beginner),
            "intermediate" | "2" => Ok(Difficulty::Intermediate),
            "advanced" | "4" => Ok(Difficulty::Advanced),
            _ => bail!("Unknown level '{s}', expected beginner, intermediate or advanced"),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} suit", self.name(), self.suit_count())?;
        if self.suit_count() > 1 {
            f.write_str("s")?;
        }
        f.write_str(")")
    }
}

/// Builds the unshuffled 104-card deck: as many copies of each suit's 13
/// ranks as it takes to reach 104.
pub fn build_deck(difficulty: Difficulty) -> Vec<Card> {
    let suits = difficulty.suits();
    let copies = DECK_SIZE / (suits.len() * MAX_RANK as usize);
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for _ in 0..copies {
        for &suit in suits {
            for rank in Card::ACE..=Card::KING {
                deck.push(Card::new(suit, rank));
            }
        }
    }
    deck
}

/// Fisher-Yates shuffle in place.
pub fn shuffle<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}

/// Lays out a shuffled deck: piles are filled one after another from the
/// head of the deck, each showing only its last card, and the remaining
/// cards become the stock in deck order.
pub fn deal(deck: Vec<Card>, initial_score: u32) -> Board {
    debug_assert_eq!(deck.len(), DECK_SIZE);
    let mut draw = deck.into_iter();
    let piles: [Pile; TOTAL_PILES] = std::array::from_fn(|idx| {
        let cards: Vec<Card> = draw.by_ref().take(PILE_SIZES[idx]).collect();
        Pile::new(cards, 1)
    });
    Board::new(piles, draw.collect(), initial_score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STOCK_SIZE;

    use rand::{SeedableRng, rngs::StdRng};
    use std::collections::HashMap;

    #[test]
    fn test_deck_composition() {
        for difficulty in Difficulty::ALL {
            let deck = build_deck(difficulty);
            assert_eq!(deck.len(), DECK_SIZE);

            let mut counts: HashMap<Card, usize> = HashMap::new();
            for card in &deck {
                *counts.entry(*card).or_default() += 1;
            }
            assert_eq!(counts.len(), difficulty.suit_count() * 13);
            let copies = 8 / difficulty.suit_count();
            assert!(counts.values().all(|&n| n == copies));
            assert!(deck.iter().all(|c| difficulty.suits().contains(&c.suit())));
        }
    }

    #[test]
    fn test_difficulty_names() {
        assert_eq!("Beginner".parse::<Difficulty>().unwrap(), Difficulty::Beginner);
        assert_eq!("2".parse::<Difficulty>().unwrap(), Difficulty::Intermediate);
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::from_name_or_default("expert"), Difficulty::Advanced);
        assert_eq!(Difficulty::Beginner.to_string(), "beginner (1 suit)");
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = StdRng::seed_from_u64(7);
        let original = build_deck(Difficulty::Advanced);
        let mut deck = original.clone();
        shuffle(&mut deck, &mut rng);
        assert_ne!(deck, original);

        let mut sorted = deck.clone();
        sorted.sort();
        let mut expected = original;
        expected.sort();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_shuffle_reaches_every_position() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [[0usize; 4]; 4];
        for _ in 0..4000 {
            let mut items = [0usize, 1, 2, 3];
            shuffle(&mut items, &mut rng);
            for (pos, &item) in items.iter().enumerate() {
                seen[item][pos] += 1;
            }
        }
        for row in seen {
            for count in row {
                assert!((800..1200).contains(&count), "biased shuffle: {count}");
            }
        }
    }

    #[test]
    fn test_deal_layout() {
        for difficulty in Difficulty::ALL {
            let mut deck = build_deck(difficulty);
            shuffle(&mut deck, &mut StdRng::seed_from_u64(3));
            let head = deck[..6].to_vec();
            let tail = *deck.last().unwrap();
            let board = deal(deck, 500);

            let sizes: Vec<usize> = board.piles().iter().map(Pile::len).collect();
            assert_eq!(sizes, PILE_SIZES);
            assert!(board.piles().iter().all(|p| p.face_up_count() == 1));
            assert_eq!(board.pile(0).unwrap().cards(), &head[..]);
            assert_eq!(board.stock().len(), STOCK_SIZE);
            assert_eq!(board.stock().last(), Some(&tail));
            assert_eq!(board.card_count(), DECK_SIZE);
            assert_eq!(board.score(), 500);
            assert!(board.is_valid());
        }
    }
}
