use crate::{Card, DeckRules, DeckState, RngState};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SimulationError {
    #[error("deck has {size} cards, at least {minimum} are needed to deal")]
    NotPlayable { size: usize, minimum: usize },
}

/// Opening hand and prize cards drawn from the top of a shuffled deck.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Deal {
    pub hand: Vec<Card>,
    pub prizes: Vec<Card>,
}

/// Shuffles the deck in place, then takes the hand and the prize cards off
/// the top. Playability is the deck's own rule; `rules` only sizes the deal.
pub fn deal(
    deck: &mut DeckState,
    rules: &DeckRules,
    rng: &mut RngState,
) -> Result<Deal, SimulationError> {
    if !deck.is_playable() {
        return Err(SimulationError::NotPlayable {
            size: deck.len(),
            minimum: deck.playable_minimum(),
        });
    }
    deck.shuffle(rng);
    let mut top = deck.cards().iter().cloned();
    let hand: Vec<Card> = top.by_ref().take(rules.hand_size).collect();
    let prizes: Vec<Card> = top.take(rules.prize_count).collect();
    debug!(seed = rng.seed(), hand = hand.len(), prizes = prizes.len(), "dealt");
    Ok(Deal { hand, prizes })
}
