use spider_common::action::Action;

/// A legal run transfer together with its heuristic score.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct HintMove {
    pub source: usize,
    pub start: usize,
    pub target: usize,
    pub count: usize,
    pub score: u32,
}

impl HintMove {
    pub fn new(source: usize, start: usize, target: usize, count: usize, score: u32) -> Self {
        HintMove {
            source,
            start,
            target,
            count,
            score,
        }
    }

    #[inline]
    pub fn values(&self) -> (usize, usize, usize) {
        (self.source, self.start, self.target)
    }

    pub fn to_action(&self) -> Action {
        Action::Move {
            from: self.source,
            to: self.target,
            count: self.count,
        }
    }
}
