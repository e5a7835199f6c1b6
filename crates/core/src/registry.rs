use crate::{total_price, Card, DeckRules, DeckState};
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("deck index {index} out of range for {len} decks")]
    DeckIndexOutOfRange { index: usize, len: usize },
    #[error("card index {index} out of range for deck of {len}")]
    CardIndexOutOfRange { index: usize, len: usize },
    #[error("at most {max} main cards can be selected (got {requested})")]
    TooManyMainCards { max: usize, requested: usize },
    #[error("deck has no cards")]
    EmptyDeck,
}

/// A side-loaded deck kept next to the active one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistryDeck {
    pub name: String,
    pub cards: Vec<Card>,
    pub price: f64,
    /// Indices into `cards`; the first is the primary preview.
    pub main_cards: Vec<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCardToggle {
    Selected,
    Deselected,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeckPreview<'a> {
    pub primary: &'a Card,
    pub secondary: Vec<&'a Card>,
}

#[derive(Debug, Clone)]
pub struct DeckRegistry {
    decks: Vec<RegistryDeck>,
    max_main_cards: usize,
}

impl Default for DeckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn with_suffix(name: &str, suffix: usize) -> String {
    match name.rfind('.') {
        Some(dot) if dot > 0 => format!("{} ({suffix}){}", &name[..dot], &name[dot..]),
        _ => format!("{name} ({suffix})"),
    }
}

/// Main-card selection groups copies by name and set name.
fn selection_key(card: &Card) -> (&str, Option<&str>) {
    (card.name.as_str(), card.set_name())
}

impl DeckRegistry {
    pub fn new() -> Self {
        Self::with_rules(&DeckRules::default())
    }

    pub fn with_rules(rules: &DeckRules) -> Self {
        Self {
            decks: Vec::new(),
            max_main_cards: rules.max_main_cards,
        }
    }

    pub fn len(&self) -> usize {
        self.decks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RegistryDeck> {
        self.decks.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RegistryDeck> {
        self.decks.iter()
    }

    pub fn total_price(&self) -> f64 {
        self.decks.iter().map(|deck| deck.price).sum()
    }

    fn deck(&self, index: usize) -> Result<&RegistryDeck, RegistryError> {
        self.decks.get(index).ok_or(RegistryError::DeckIndexOutOfRange {
            index,
            len: self.decks.len(),
        })
    }

    fn deck_mut(&mut self, index: usize) -> Result<&mut RegistryDeck, RegistryError> {
        let len = self.decks.len();
        self.decks
            .get_mut(index)
            .ok_or(RegistryError::DeckIndexOutOfRange { index, len })
    }

    /// `deck.json`, `deck (2).json`, `deck (3).json`, ...
    pub fn unique_name(&self, name: &str) -> String {
        let taken: HashSet<&str> = self.decks.iter().map(|deck| deck.name.as_str()).collect();
        if !taken.contains(name) {
            return name.to_string();
        }
        (2..)
            .map(|suffix| with_suffix(name, suffix))
            .find(|candidate| !taken.contains(candidate.as_str()))
            .unwrap_or_else(|| name.to_string())
    }

    /// Adds a deck and returns its index.
    pub fn add_deck(&mut self, name: &str, cards: Vec<Card>) -> usize {
        let name = self.unique_name(name);
        let price = total_price(&cards);
        debug!(%name, cards = cards.len(), price, "registry deck added");
        self.decks.push(RegistryDeck {
            name,
            cards,
            price,
            main_cards: Vec::new(),
        });
        self.decks.len() - 1
    }

    pub fn remove_deck(&mut self, index: usize) -> Result<RegistryDeck, RegistryError> {
        self.deck(index)?;
        Ok(self.decks.remove(index))
    }

    /// Replaces the main-card list. Too many indices, or an index past the
    /// deck's end, leaves the current list untouched.
    pub fn set_main_cards(
        &mut self,
        deck_index: usize,
        card_indices: &[usize],
    ) -> Result<(), RegistryError> {
        let max = self.max_main_cards;
        let deck = self.deck_mut(deck_index)?;
        if card_indices.len() > max {
            return Err(RegistryError::TooManyMainCards {
                max,
                requested: card_indices.len(),
            });
        }
        if let Some(&index) = card_indices.iter().find(|&&i| i >= deck.cards.len()) {
            return Err(RegistryError::CardIndexOutOfRange {
                index,
                len: deck.cards.len(),
            });
        }
        deck.main_cards = card_indices.to_vec();
        Ok(())
    }

    /// Selects or deselects the card at `card_index` as a main card.
    /// Deselecting drops every selected copy with the same name and set.
    pub fn toggle_main_card(
        &mut self,
        deck_index: usize,
        card_index: usize,
    ) -> Result<MainCardToggle, RegistryError> {
        let max = self.max_main_cards;
        let deck = self.deck_mut(deck_index)?;
        if deck.cards.is_empty() {
            return Err(RegistryError::EmptyDeck);
        }
        let Some(card) = deck.cards.get(card_index) else {
            return Err(RegistryError::CardIndexOutOfRange {
                index: card_index,
                len: deck.cards.len(),
            });
        };
        let key = selection_key(card);
        let already = deck
            .main_cards
            .iter()
            .any(|&i| deck.cards.get(i).map(selection_key) == Some(key));
        if already {
            let cards = &deck.cards;
            deck.main_cards
                .retain(|&i| cards.get(i).map(selection_key) != Some(key));
            return Ok(MainCardToggle::Deselected);
        }
        if deck.main_cards.len() >= max {
            return Err(RegistryError::TooManyMainCards {
                max,
                requested: deck.main_cards.len() + 1,
            });
        }
        deck.main_cards.push(card_index);
        Ok(MainCardToggle::Selected)
    }

    /// Preview cards for a deck; without main cards the first card stands in.
    pub fn preview(&self, deck_index: usize) -> Option<DeckPreview<'_>> {
        let deck = self.decks.get(deck_index)?;
        let mut picks = deck.main_cards.iter().filter_map(|&i| deck.cards.get(i));
        match picks.next() {
            Some(primary) => Some(DeckPreview {
                primary,
                secondary: picks.collect(),
            }),
            None => deck.cards.first().map(|primary| DeckPreview {
                primary,
                secondary: Vec::new(),
            }),
        }
    }

    /// Loads a copy of the deck into the active engine. Later edits to the
    /// active deck do not touch the registry entry.
    pub fn activate(&self, deck_index: usize, active: &mut DeckState) -> Result<(), RegistryError> {
        let deck = self.deck(deck_index)?;
        debug!(name = %deck.name, cards = deck.cards.len(), "activating registry deck");
        active.replace_all(deck.cards.clone());
        Ok(())
    }
}
