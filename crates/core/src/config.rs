use serde::{Deserialize, Serialize};

/// Format rules and engine limits. Every field has a default so a rules
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckRules {
    /// Minimum deck size before the deal simulation is allowed.
    pub playable_minimum: usize,
    pub hand_size: usize,
    pub prize_count: usize,
    pub max_main_cards: usize,
    /// Oldest removed cards are forgotten past this many.
    pub undo_capacity: usize,
}

impl DeckRules {
    pub const PLAYABLE_MINIMUM: usize = 40;
    pub const HAND_SIZE: usize = 7;
    pub const PRIZE_COUNT: usize = 6;
    pub const MAX_MAIN_CARDS: usize = 3;
    pub const UNDO_CAPACITY: usize = 256;
}

impl Default for DeckRules {
    fn default() -> Self {
        Self {
            playable_minimum: Self::PLAYABLE_MINIMUM,
            hand_size: Self::HAND_SIZE,
            prize_count: Self::PRIZE_COUNT,
            max_main_cards: Self::MAX_MAIN_CARDS,
            undo_capacity: Self::UNDO_CAPACITY,
        }
    }
}
