use crate::board::Board;

use std::collections::VecDeque;

/// Bounded undo stack of whole-board snapshots.
#[derive(Debug, Clone)]
pub struct History {
    snapshots: VecDeque<Board>,
    limit: usize,
}

impl History {
    pub fn new(limit: usize) -> Self {
        Self {
            snapshots: VecDeque::new(),
            limit,
        }
    }

    /// Records a copy of `board`, dropping the oldest snapshot when full.
    pub fn push(&mut self, board: &Board) {
        if self.limit == 0 {
            return;
        }
        if self.snapshots.len() == self.limit {
            self.snapshots.pop_front();
            log::debug!("history full, dropped oldest snapshot");
        }
        self.snapshots.push_back(board.clone());
    }

    pub fn pop(&mut self) -> Option<Board> {
        self.snapshots.pop_back()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }
}
