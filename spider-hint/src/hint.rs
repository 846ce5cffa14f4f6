use crate::move_::HintMove;

use smallvec::SmallVec;
use spider_common::action::describe_action;
use spider_common::board::{Board, Pile};
use spider_common::rules::can_drop;

const EXPOSE_WEIGHT: u32 = 50;
const KING_TO_EMPTY_WEIGHT: u32 = 30;
const TO_EMPTY_WEIGHT: u32 = 10;
const RUN_CARD_WEIGHT: u32 = 5;
const KING_RUN_CARD_WEIGHT: u32 = 10;
const SAME_SUIT_WEIGHT: u32 = 20;

pub type LegalMoves = SmallVec<[HintMove; 64]>;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hint {
    Move(HintMove),
    /// No run can move; turn over the face-down top card at `index`.
    Flip { pile: usize, index: usize },
    None,
}

impl Hint {
    pub fn is_none(&self) -> bool {
        matches!(self, Hint::None)
    }

    pub fn describe(&self, board: &Board) -> String {
        match self {
            Hint::Move(mov) => describe_action(board, &mov.to_action()),
            Hint::Flip { pile, .. } => format!("Turn over the top card of Pile{}", pile + 1),
            Hint::None => "No hint available".to_string(),
        }
    }
}

/// Best scoring legal move on `board`, or a face-down top card to turn over
/// when nothing can move. Ties go to the move enumerated first.
pub fn compute_hint(board: &Board) -> Hint {
    let mut best: Option<HintMove> = None;
    for mov in legal_moves(board) {
        if best.is_none_or(|b| mov.score > b.score) {
            best = Some(mov);
        }
    }
    if let Some(mov) = best {
        log::debug!(
            "hint: pile {} @{} -> pile {} scored {}",
            mov.source,
            mov.start,
            mov.target,
            mov.score
        );
        return Hint::Move(mov);
    }

    match board
        .piles()
        .iter()
        .position(|pile| pile.top_is_face_down())
    {
        Some(pile) => {
            let index = board.piles()[pile].len() - 1;
            log::debug!("hint: no legal move, flip pile {pile}");
            Hint::Flip { pile, index }
        }
        None => {
            log::debug!("hint: nothing to suggest");
            Hint::None
        }
    }
}

/// Every legal run transfer on `board`, scored.
///
/// Sources and targets are tried in pile order; within a source the top run
/// comes first, then each longer slice anchored at a break below it.
pub fn legal_moves(board: &Board) -> LegalMoves {
    let mut moves = LegalMoves::new();
    for (source, pile) in board.piles().iter().enumerate() {
        for (start, sequence) in run_starts(pile) {
            let cards = &pile.cards()[start..];
            let bottom = cards[0];
            let exposes = start > 0 && !pile.is_face_up(start - 1);
            let sequence = sequence as u32;
            for (target, target_pile) in board.piles().iter().enumerate() {
                if target == source || !can_drop(cards, target_pile) {
                    continue;
                }

                let mut score = RUN_CARD_WEIGHT * sequence;
                if exposes {
                    score += EXPOSE_WEIGHT;
                }
                match target_pile.peek_top() {
                    None if bottom.is_king() => score += KING_TO_EMPTY_WEIGHT,
                    None => score += TO_EMPTY_WEIGHT,
                    Some(top) if top.suit() == bottom.suit() => score += SAME_SUIT_WEIGHT,
                    Some(_) => {}
                }
                if bottom.is_king() && sequence > 1 {
                    score += KING_RUN_CARD_WEIGHT * sequence;
                }

                moves.push(HintMove::new(source, start, target, cards.len(), score));
            }
        }
    }
    moves
}

/// Walks the face-up cards from the top down and records where each
/// same-suit descending run begins, with that run's length.
fn run_starts(pile: &Pile) -> SmallVec<[(usize, usize); 16]> {
    let mut starts = SmallVec::new();
    if pile.face_up_count() == 0 {
        return starts;
    }
    let cards = pile.cards();
    let lowest = pile.first_face_up();
    let mut end = cards.len();
    let mut start = end - 1;
    loop {
        while start > lowest && cards[start].continues_run(&cards[start - 1]) {
            start -= 1;
        }
        starts.push((start, end - start));
        if start == lowest {
            break;
        }
        end = start;
        start -= 1;
    }
    starts
}
