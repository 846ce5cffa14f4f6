use anyhow::{Context, Result, bail};
use std::fmt;

pub const MAX_RANK: u8 = 13;
pub const MAX_SUIT: u8 = 4;

const SUITS: [char; 4] = ['♠', '♥', '♦', '♣'];
const SUITS_ASCII: [char; 4] = ['S', 'H', 'D', 'C'];
const RANKS: [char; 13] = [
    'A', '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K',
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Spades,
    Hearts,
    Diamonds,
    Clubs,
}

impl Suit {
    pub const ALL: [Suit; 4] = [Suit::Spades, Suit::Hearts, Suit::Diamonds, Suit::Clubs];

    fn from_index(index: u8) -> Self {
        Self::ALL[(index % MAX_SUIT) as usize]
    }

    pub fn symbol(self) -> char {
        SUITS[self as usize]
    }

    pub fn parse(symbol: char) -> Result<Self> {
        let upper = symbol.to_ascii_uppercase();
        SUITS
            .iter()
            .position(|&s| s == symbol)
            .or_else(|| SUITS_ASCII.iter().position(|&s| s == upper))
            .map(|idx| Self::ALL[idx])
            .with_context(|| format!("Invalid suit '{symbol}'"))
    }
}

/// Numeric value of a rank symbol, Ace low: `A` = 1 up to `K` = 13.
pub fn rank_value(symbol: &str) -> Option<u8> {
    if symbol == "10" {
        return Some(10);
    }
    let mut chars = symbol.chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    RANKS.iter().position(|&r| r == c).map(|idx| idx as u8 + 1)
}

/// A playing card packed into one byte.
///
/// Equality is by suit and rank only; the two decks in play produce
/// indistinguishable duplicates. Whether a card shows its face is a property
/// of the pile holding it, see [`crate::board::Pile`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card(u8);

impl Card {
    pub const ACE: u8 = 1;
    pub const KING: u8 = MAX_RANK;

    /// `rank` runs from 1 (Ace) to 13 (King).
    pub fn new(suit: Suit, rank: u8) -> Self {
        debug_assert!((Self::ACE..=Self::KING).contains(&rank));
        Self(suit as u8 * MAX_RANK + (rank - 1))
    }

    pub fn parse(rank: &str, suit: char) -> Result<Self> {
        let Some(value) = rank_value(rank) else {
            bail!("Invalid rank at card {rank}{suit}");
        };
        let suit = Suit::parse(suit).with_context(|| format!("Invalid card {rank}{suit}"))?;
        Ok(Card::new(suit, value))
    }

    pub fn rank(&self) -> u8 {
        self.0 % MAX_RANK + 1
    }

    pub fn suit(&self) -> Suit {
        Suit::from_index(self.0 / MAX_RANK)
    }

    pub fn is_king(&self) -> bool {
        self.rank() == Self::KING
    }

    /// Whether `self` may rest on `below` by rank alone.
    pub fn fits_on(&self, below: &Card) -> bool {
        below.rank() == self.rank() + 1
    }

    /// Whether `self` extends a same-suit descending run ending in `below`.
    pub fn continues_run(&self, below: &Card) -> bool {
        self.fits_on(below) && self.suit() == below.suit()
    }

    pub fn pretty_print(&self) -> String {
        format!("{}{}", RANKS[(self.rank() - 1) as usize], self.suit().symbol())
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pretty_print())
    }
}

/// Parses a run of card symbols such as `K♠Q♠10♥` or `KS QS TH`.
pub fn parse_cards(s: &str) -> Result<Vec<Card>> {
    let mut cards = Vec::new();
    let mut rank = String::new();
    for c in s.chars() {
        if c.is_whitespace() || c == '|' {
            if !rank.is_empty() {
                bail!("Missing suit after rank '{rank}'");
            }
            continue;
        }
        if rank.is_empty() || (rank == "1" && c == '0') {
            rank.push(c);
            continue;
        }
        cards.push(Card::parse(&rank, c)?);
        rank.clear();
    }
    if !rank.is_empty() {
        bail!("Missing suit after rank '{rank}'");
    }
    Ok(cards)
}
