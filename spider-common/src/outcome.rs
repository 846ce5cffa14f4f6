use std::fmt;

/// Result of a mutating engine operation. Declined operations leave the
/// board untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Applied,
    Declined(Declined),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }

    pub fn reason(&self) -> Option<Declined> {
        match self {
            Outcome::Applied => None,
            Outcome::Declined(reason) => Some(*reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Declined {
    NoSuchPile,
    SamePile,
    NotMovable,
    IllegalDrop,
    NotRevealable,
    EmptyPile,
    EmptyStock,
    NothingToUndo,
}

impl Declined {
    /// Stable reason code for callers that switch on strings.
    pub fn code(&self) -> &'static str {
        match self {
            Declined::NoSuchPile => "no_such_pile",
            Declined::SamePile => "same_pile",
            Declined::NotMovable => "not_movable",
            Declined::IllegalDrop => "illegal_drop",
            Declined::NotRevealable => "not_revealable",
            Declined::EmptyPile => "empty_pile",
            Declined::EmptyStock => "empty_stock",
            Declined::NothingToUndo => "nothing_to_undo",
        }
    }
}

impl fmt::Display for Declined {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Declined::NoSuchPile => "there is no such pile",
            Declined::SamePile => "cards must move to a different pile",
            Declined::NotMovable => "only face-up cards can be moved",
            Declined::IllegalDrop => "the run does not fit on that pile",
            Declined::NotRevealable => "only a face-down top card can be turned over",
            Declined::EmptyPile => "cannot deal while a tableau pile is empty",
            Declined::EmptyStock => "the stock is empty",
            Declined::NothingToUndo => "nothing to undo",
        };
        f.write_str(message)
    }
}
