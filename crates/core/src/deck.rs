use crate::{
    sort_cards, Card, CardKey, Category, DeckChange, DeckRules, ListenerId, Listeners, RngState,
};
use serde::Serialize;
use std::collections::{HashMap, VecDeque};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("card index {index} out of range for deck of {len}")]
    IndexOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DeckStats {
    pub total: usize,
    pub creatures: usize,
    pub modifiers: usize,
    pub resources: usize,
    pub uncategorized: usize,
    pub price: f64,
}

/// One display entry: the first copy of an identity, how many copies the
/// deck holds, and where they sit.
#[derive(Debug, Clone, PartialEq)]
pub struct CardGroup<'a> {
    pub card: &'a Card,
    pub count: usize,
    pub indices: Vec<usize>,
}

/// The active deck: an ordered multiset of cards plus the undo log of
/// removed cards.
#[derive(Debug)]
pub struct DeckState {
    cards: Vec<Card>,
    removed: VecDeque<Card>,
    playable_minimum: usize,
    undo_capacity: usize,
    listeners: Listeners,
}

impl Default for DeckState {
    fn default() -> Self {
        Self::new()
    }
}

impl DeckState {
    pub fn new() -> Self {
        Self::with_rules(&DeckRules::default())
    }

    pub fn with_rules(rules: &DeckRules) -> Self {
        Self {
            cards: Vec::new(),
            removed: VecDeque::new(),
            playable_minimum: rules.playable_minimum,
            undo_capacity: rules.undo_capacity,
            listeners: Listeners::default(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of removed cards that `restore_last` can bring back.
    pub fn undo_len(&self) -> usize {
        self.removed.len()
    }

    pub fn on_change<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&DeckChange, &[Card]) + 'static,
    {
        self.listeners.add(Box::new(listener))
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn emit(&mut self, change: DeckChange) {
        debug!(?change, len = self.cards.len(), "deck changed");
        self.listeners.notify(&change, &self.cards);
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
        let index = self.cards.len() - 1;
        self.emit(DeckChange::Added { index });
    }

    pub fn remove_at(&mut self, index: usize) -> Result<Card, DeckError> {
        if index >= self.cards.len() {
            return Err(DeckError::IndexOutOfRange {
                index,
                len: self.cards.len(),
            });
        }
        let card = self.cards.remove(index);
        self.push_removed(card.clone());
        self.emit(DeckChange::Removed { index });
        Ok(card)
    }

    fn push_removed(&mut self, card: Card) {
        if self.undo_capacity == 0 {
            return;
        }
        if self.removed.len() == self.undo_capacity {
            if let Some(evicted) = self.removed.pop_front() {
                debug!(name = %evicted.name, "undo log full, dropping oldest entry");
            }
        }
        self.removed.push_back(card);
    }

    /// Removes the most recently added copy sharing `card`'s identity.
    pub fn remove_last_matching(&mut self, card: &Card) -> bool {
        let Some(index) = self.cards.iter().rposition(|c| c.same_identity(card)) else {
            return false;
        };
        self.remove_at(index).is_ok()
    }

    /// Re-appends the most recently removed card. The original position is
    /// not restored.
    pub fn restore_last(&mut self) -> Option<&Card> {
        let card = self.removed.pop_back()?;
        self.cards.push(card);
        let index = self.cards.len() - 1;
        self.emit(DeckChange::Restored { index });
        self.cards.last()
    }

    pub fn count_by_identity(&self, card: &Card) -> usize {
        self.cards.iter().filter(|c| c.same_identity(card)).count()
    }

    pub fn contains_identity(&self, card: &Card) -> bool {
        self.cards.iter().any(|c| c.same_identity(card))
    }

    /// Empties the deck. The undo log is kept, so cards removed before the
    /// clear can still be restored.
    pub fn clear(&mut self) {
        self.cards.clear();
        self.emit(DeckChange::Cleared);
    }

    pub fn replace_all(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        let len = self.cards.len();
        self.emit(DeckChange::Replaced { len });
    }

    pub fn stats(&self) -> DeckStats {
        let mut stats = DeckStats::default();
        for card in &self.cards {
            stats.total += 1;
            match card.category {
                Category::Creature => stats.creatures += 1,
                Category::Modifier => stats.modifiers += 1,
                Category::Resource => stats.resources += 1,
                Category::Unknown(_) => stats.uncategorized += 1,
            }
            stats.price += card.price_or_zero();
        }
        stats
    }

    pub fn sort(&mut self) {
        sort_cards(&mut self.cards);
        self.emit(DeckChange::Sorted);
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(&mut self.cards);
        self.emit(DeckChange::Shuffled);
    }

    pub fn is_playable(&self) -> bool {
        self.cards.len() >= self.playable_minimum
    }

    pub fn playable_minimum(&self) -> usize {
        self.playable_minimum
    }

    /// One group per identity, in the order each identity first appeared.
    pub fn groups(&self) -> Vec<CardGroup<'_>> {
        let mut slots: HashMap<CardKey, usize> = HashMap::new();
        let mut groups: Vec<CardGroup<'_>> = Vec::new();
        for (index, card) in self.cards.iter().enumerate() {
            let slot = *slots.entry(card.key()).or_insert_with(|| {
                groups.push(CardGroup {
                    card,
                    count: 0,
                    indices: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].count += 1;
            groups[slot].indices.push(index);
        }
        groups
    }
}
