//! Move legality and the mutations that follow from it.
//!
//! Every mutation comes in two halves: a `check_*` method that reports why an
//! operation would be declined without touching the board, and the operation
//! itself, which runs the same check first. Callers that snapshot history
//! (see [`crate::game::Game`]) check, snapshot, then mutate.

use crate::board::{Board, Pile, SET_SIZE, TOTAL_PILES, TOTAL_SETS};
use crate::card::Card;
use crate::config::EngineConfig;
use crate::outcome::{Declined, Outcome};

use std::ops::Range;

/// Whether `cards` may be dropped on `target`. Any run fits on an empty pile;
/// otherwise the target's top must be exactly one rank above the run's first
/// card, whatever its suit.
pub fn can_drop(cards: &[Card], target: &Pile) -> bool {
    match (target.peek_top(), cards.first()) {
        (None, _) => true,
        (Some(top), Some(first)) => first.fits_on(top),
        (Some(_), None) => false,
    }
}

/// True for exactly thirteen cards of one suit reading King down to Ace.
pub fn is_completed_set(cards: &[Card]) -> bool {
    let Some(first) = cards.first() else {
        return false;
    };
    cards.len() == SET_SIZE
        && cards.iter().enumerate().all(|(i, card)| {
            card.suit() == first.suit() && card.rank() as usize == Card::KING as usize - i
        })
}

impl Board {
    /// Indices of the longest run ending at the top of the pile that moves
    /// as a unit: face-up, one suit, ranks descending by one. Empty when the
    /// pile is empty, its top is face down, or there is no such pile.
    pub fn draggable_run(&self, pile_idx: usize) -> Range<usize> {
        let Some(pile) = self.piles.get(pile_idx) else {
            return 0..0;
        };
        let len = pile.len();
        if pile.face_up_count == 0 {
            return len..len;
        }
        let lowest = pile.first_face_up();
        let mut start = len - 1;
        while start > lowest && pile.cards[start].continues_run(&pile.cards[start - 1]) {
            start -= 1;
        }
        start..len
    }

    pub fn check_move(&self, source: usize, start: usize, target: usize) -> Result<(), Declined> {
        if source >= TOTAL_PILES || target >= TOTAL_PILES {
            return Err(Declined::NoSuchPile);
        }
        if source == target {
            return Err(Declined::SamePile);
        }
        if !self.piles[source].is_face_up(start) {
            return Err(Declined::NotMovable);
        }
        if !can_drop(&self.piles[source].cards[start..], &self.piles[target]) {
            return Err(Declined::IllegalDrop);
        }
        Ok(())
    }

    /// Moves `source[start..]` onto `target`, turns up the card it uncovers,
    /// charges the move penalty and retires any completed set.
    ///
    /// Only the drop is checked against the target: the moved cards need not
    /// form a single run, they only have to be face up.
    pub fn apply_move(
        &mut self,
        source: usize,
        start: usize,
        target: usize,
        config: &EngineConfig,
    ) -> Outcome {
        if let Err(reason) = self.check_move(source, start, target) {
            log::debug!("move {source}@{start} -> {target} declined: {reason}");
            return Outcome::Declined(reason);
        }

        let run = self.piles[source].split_off(start);
        log::debug!("move {} card(s) from pile {source} to pile {target}", run.len());
        self.piles[target].extend_face_up(run);
        self.piles[source].flip_top();
        self.score = self.score.saturating_sub(config.move_penalty);
        self.retire_completed_sets(config);
        Outcome::Applied
    }

    pub fn check_reveal(&self, pile_idx: usize, card_idx: usize) -> Result<(), Declined> {
        let pile = self.piles.get(pile_idx).ok_or(Declined::NoSuchPile)?;
        if card_idx.checked_add(1) != Some(pile.len()) || !pile.top_is_face_down() {
            return Err(Declined::NotRevealable);
        }
        Ok(())
    }

    /// Turns the face-down top card of a pile face up.
    pub fn reveal_card(&mut self, pile_idx: usize, card_idx: usize) -> Outcome {
        if let Err(reason) = self.check_reveal(pile_idx, card_idx) {
            return Outcome::Declined(reason);
        }
        self.piles[pile_idx].flip_top();
        log::debug!("revealed top card of pile {pile_idx}");
        Outcome::Applied
    }

    pub fn check_deal(&self) -> Result<(), Declined> {
        if self.stock.is_empty() {
            return Err(Declined::EmptyStock);
        }
        if self.has_empty_pile() {
            return Err(Declined::EmptyPile);
        }
        Ok(())
    }

    /// Deals one face-up card from the stock onto each pile in order,
    /// stopping early if the stock runs out.
    pub fn deal_from_stock(&mut self, config: &EngineConfig) -> Outcome {
        if let Err(reason) = self.check_deal() {
            log::debug!("deal declined: {reason}");
            return Outcome::Declined(reason);
        }
        for pile in self.piles.iter_mut() {
            let Some(card) = self.stock.pop() else {
                break;
            };
            pile.push_face_up(card);
        }
        log::debug!("dealt from stock, {} card(s) left", self.stock.len());
        self.score = self.score.saturating_sub(config.deal_penalty);
        self.retire_completed_sets(config);
        Outcome::Applied
    }

    /// Removes every completed set sitting on top of a pile, in one pass over
    /// the piles. Returns how many were retired.
    pub fn retire_completed_sets(&mut self, config: &EngineConfig) -> u8 {
        let mut found = 0;
        for (idx, pile) in self.piles.iter_mut().enumerate() {
            let len = pile.len();
            if len < SET_SIZE || pile.face_up_count < SET_SIZE {
                continue;
            }
            if is_completed_set(&pile.cards[len - SET_SIZE..]) {
                pile.split_off(len - SET_SIZE);
                pile.flip_top();
                found += 1;
                log::debug!("completed a set on pile {idx}");
            }
        }

        if found > 0 {
            self.completed_sets = (self.completed_sets + found).min(TOTAL_SETS);
            self.score = self
                .score
                .saturating_add(config.completion_bonus.saturating_mul(found as u32));
            if self.completed_sets >= TOTAL_SETS {
                self.won = true;
                log::info!("all {TOTAL_SETS} sets completed, final score {}", self.score);
            }
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::Suit;
    use crate::deck::{Difficulty, build_deck, deal};

    fn board(s: &str) -> Board {
        Board::parse(s).unwrap()
    }

    #[test]
    fn test_draggable_run() {
        let b = board(
            r#"Pile1: 9♣8♣|K♥7♠6♠5♥4♥3♥
Pile2: 4♦|
Pile3: |Q♠"#,
        );
        assert_eq!(b.draggable_run(0), 5..8);
        assert_eq!(b.draggable_run(1), 1..1);
        assert_eq!(b.draggable_run(2), 0..1);
        assert_eq!(b.draggable_run(3), 0..0);
        assert_eq!(b.draggable_run(42), 0..0);

        let pile = b.pile(0).unwrap();
        for idx in b.draggable_run(0) {
            assert!(pile.is_face_up(idx));
        }
        for pair in pile.cards()[5..].windows(2) {
            assert!(pair[1].continues_run(&pair[0]));
        }
    }

    #[test]
    fn test_draggable_run_stops_at_face_down() {
        let b = board("Pile1: 8♠|7♠6♠");
        assert_eq!(b.draggable_run(0), 1..3);
    }

    #[test]
    fn test_can_drop() {
        let seven = Pile::new(vec![Card::new(Suit::Clubs, 7)], 1);
        let six_hearts = [Card::new(Suit::Hearts, 6), Card::new(Suit::Hearts, 5)];
        assert!(can_drop(&six_hearts, &seven));
        assert!(!can_drop(&six_hearts[1..], &seven));
        assert!(can_drop(&six_hearts, &Pile::default()));
        assert!(!can_drop(&[], &seven));
    }

    #[test]
    fn test_apply_move() {
        let config = EngineConfig::default();
        let mut b = board(
            r#"Pile1: 3♦|9♠8♠
Pile2: |T♥
Pile3: |A♣
Score: 500"#,
        );

        let before = b.clone();
        assert_eq!(b.apply_move(0, 1, 0, &config), Outcome::Declined(Declined::SamePile));
        assert_eq!(b.apply_move(0, 1, 2, &config), Outcome::Declined(Declined::IllegalDrop));
        assert_eq!(b.apply_move(0, 0, 1, &config), Outcome::Declined(Declined::NotMovable));
        assert_eq!(b.apply_move(0, 1, 9, &config), Outcome::Declined(Declined::NoSuchPile));
        assert_eq!(b, before);

        assert!(b.apply_move(0, 1, 1, &config).is_applied());
        assert_eq!(b.pile(1).unwrap().len(), 3);
        assert_eq!(b.pile(1).unwrap().face_up_count(), 3);
        assert_eq!(b.pile(0).unwrap().face_up_count(), 1);
        assert_eq!(b.score(), 499);

        // a sub-run of the movable run may move on its own
        assert!(b.apply_move(1, 2, 3, &config).is_applied());
        assert_eq!(b.pile(1).unwrap().len(), 2);
        assert_eq!(b.pile(3).unwrap().cards(), &[Card::new(Suit::Spades, 8)]);
    }

    #[test]
    fn test_move_across_a_suit_break() {
        let config = EngineConfig::default();
        let mut b = board("Pile1: 2♠|8♣7♥6♥\nPile2: |9♦\nScore: 500");
        assert_eq!(b.draggable_run(0), 2..4);
        assert_eq!(b.apply_move(0, 0, 1, &config), Outcome::Declined(Declined::NotMovable));
        assert_eq!(b.apply_move(0, 4, 1, &config), Outcome::Declined(Declined::NotMovable));

        assert!(b.apply_move(0, 1, 1, &config).is_applied());
        let target = b.pile(1).unwrap();
        assert_eq!(target.len(), 4);
        assert_eq!(target.face_up_count(), 4);
        assert_eq!(b.pile(0).unwrap().face_up_count(), 1);
    }

    #[test]
    fn test_score_floor() {
        let config = EngineConfig::default();
        let mut b = board(
            r#"Stock: A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠A♠
Pile1: |9♠
Pile2: |9♥
Pile3: |K♠
Pile4: |K♠
Pile5: |K♠
Pile6: |K♠
Pile7: |K♠
Pile8: |K♠
Score: 6"#,
        );
        assert!(b.deal_from_stock(&config).is_applied());
        assert_eq!(b.score(), 1);
        assert!(b.deal_from_stock(&config).is_applied());
        assert_eq!(b.score(), 0);
        assert_eq!(b.deal_from_stock(&config), Outcome::Declined(Declined::EmptyStock));

        let mut b = board("Pile1: |9♠\nPile2: |T♥\nScore: 0");
        assert!(b.apply_move(0, 0, 1, &config).is_applied());
        assert_eq!(b.score(), 0);
    }

    #[test]
    fn test_reveal_card() {
        let mut b = board("Pile1: 5♦6♦|\nPile2: 2♣|3♣");
        assert_eq!(b.reveal_card(0, 0), Outcome::Declined(Declined::NotRevealable));
        assert_eq!(b.reveal_card(1, 1), Outcome::Declined(Declined::NotRevealable));
        assert_eq!(b.reveal_card(8, 0), Outcome::Declined(Declined::NoSuchPile));
        assert!(b.reveal_card(0, 1).is_applied());
        assert!(b.pile(0).unwrap().is_face_up(1));
        assert_eq!(b.reveal_card(0, 1), Outcome::Declined(Declined::NotRevealable));

        let mut b = board("Pile1: 4♠|");
        assert_eq!(b.reveal_card(0, usize::MAX), Outcome::Declined(Declined::NotRevealable));
        assert!(b.pile(0).unwrap().top_is_face_down());
    }

    #[test]
    fn test_deal_from_stock() {
        let config = EngineConfig::default();
        let mut b = board(
            r#"Stock: 2♥3♥4♥5♥6♥7♥8♥9♥TH
Pile1: |A♠
Pile2: |A♠
Pile3: |A♠
Pile4: |A♠
Pile5: |A♠
Pile6: |A♠
Pile7: 4♣|
Pile8: |A♠
Score: 500"#,
        );
        assert!(b.deal_from_stock(&config).is_applied());
        assert_eq!(b.stock().len(), 1);
        assert_eq!(b.pile(0).unwrap().peek_top(), Some(&Card::new(Suit::Hearts, 10)));
        assert_eq!(b.pile(7).unwrap().peek_top(), Some(&Card::new(Suit::Hearts, 3)));
        assert_eq!(b.pile(6).unwrap().face_up_count(), 1);
        assert_eq!(b.score(), 495);

        // the last card still costs a full deal
        assert!(b.deal_from_stock(&config).is_applied());
        assert_eq!(b.pile(0).unwrap().len(), 3);
        assert_eq!(b.pile(1).unwrap().len(), 2);
        assert_eq!(b.score(), 490);
        assert_eq!(b.deal_from_stock(&config), Outcome::Declined(Declined::EmptyStock));
    }

    #[test]
    fn test_deal_whole_stock() {
        let config = EngineConfig::default();
        let mut b = deal(build_deck(Difficulty::Beginner), 500);
        assert_eq!(b.deals_remaining(), 8);
        for _ in 0..7 {
            assert!(b.deal_from_stock(&config).is_applied());
        }
        assert_eq!(b.stock().len(), 4);
        assert_eq!(b.deals_remaining(), 1);

        assert!(b.deal_from_stock(&config).is_applied());
        assert!(b.stock().is_empty());
        let sizes: Vec<usize> = b.piles().iter().map(Pile::len).collect();
        assert_eq!(sizes, [14, 14, 14, 14, 12, 12, 12, 12]);
        assert_eq!(b.score(), 460);
        assert_eq!(b.completed_sets(), 0);
        assert!(b.is_valid());
        assert_eq!(b.deal_from_stock(&config), Outcome::Declined(Declined::EmptyStock));
    }

    #[test]
    fn test_deal_with_empty_pile() {
        let config = EngineConfig::default();
        let mut b = board("Stock: 2♥3♥\nPile1: |A♠\nScore: 500");
        let before = b.clone();
        let outcome = b.deal_from_stock(&config);
        assert_eq!(outcome, Outcome::Declined(Declined::EmptyPile));
        assert_eq!(outcome.reason().map(|r| r.code()), Some("empty_pile"));
        assert_eq!(b, before);
    }

    #[test]
    fn test_completed_set() {
        let config = EngineConfig::default();
        let mut b = board(
            r#"Pile1: 4♦|K♠Q♠J♠T♠9♠8♠7♠6♠5♠4♠3♠2♠
Pile2: |A♠
Score: 300"#,
        );
        assert!(b.apply_move(1, 0, 0, &config).is_applied());
        assert_eq!(b.completed_sets(), 1);
        assert_eq!(b.pile(0).unwrap().len(), 1);
        assert!(b.pile(0).unwrap().is_face_up(0));
        assert!(b.pile(1).unwrap().is_empty());
        assert_eq!(b.score(), 300 - 1 + 100);
        assert!(!b.is_won());
    }

    #[test]
    fn test_completion_bonus_saturates() {
        let config = EngineConfig::default();
        let mut b = board(&format!(
            "Pile1: |K♠Q♠J♠T♠9♠8♠7♠6♠5♠4♠3♠2♠\nPile2: |A♠\nScore: {}",
            u32::MAX
        ));
        assert!(b.apply_move(1, 0, 0, &config).is_applied());
        assert_eq!(b.completed_sets(), 1);
        assert_eq!(b.score(), u32::MAX);
    }

    #[test]
    fn test_mixed_suits_do_not_complete() {
        let config = EngineConfig::default();
        let mut b = board(
            r#"Pile1: |K♠Q♠J♠T♠9♠8♠7♠6♠5♠4♠3♠2♠
Pile2: |A♥"#,
        );
        assert!(b.apply_move(1, 0, 0, &config).is_applied());
        assert_eq!(b.completed_sets(), 0);
        assert_eq!(b.pile(0).unwrap().len(), 13);
        assert!(!is_completed_set(&b.pile(0).unwrap().cards()[..12]));
    }

    #[test]
    fn test_deal_completes_several_sets_and_wins() {
        let config = EngineConfig::default();
        let mut b = board(
            r#"Stock: 5♣4♣3♣2♣A♣5♣A♥A♠
Pile1: |K♠Q♠J♠T♠9♠8♠7♠6♠5♠4♠3♠2♠
Pile2: |K♥Q♥J♥T♥9♥8♥7♥6♥5♥4♥3♥2♥
Pile3: |6♣
Pile4: |6♣
Pile5: |6♣
Pile6: |6♣
Pile7: |6♣
Pile8: |6♣
Score: 10
Completed: 6"#,
        );
        assert!(b.deal_from_stock(&config).is_applied());
        assert_eq!(b.completed_sets(), 8);
        assert!(b.is_won());
        assert!(b.pile(0).unwrap().is_empty());
        assert!(b.pile(1).unwrap().is_empty());
        assert_eq!(b.score(), 5 + 200);
    }
}
