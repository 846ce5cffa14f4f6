/// Scoring and history constants the engine runs with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub initial_score: u32,
    /// Charged for every applied run move.
    pub move_penalty: u32,
    /// Charged for every deal from the stock, however many cards it yields.
    pub deal_penalty: u32,
    /// Awarded per retired King-to-Ace set.
    pub completion_bonus: u32,
    /// Undo depth; the oldest snapshot is dropped beyond this.
    pub history_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_score: 500,
            move_penalty: 1,
            deal_penalty: 5,
            completion_bonus: 100,
            history_limit: 20,
        }
    }
}
