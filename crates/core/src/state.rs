use crate::{
    deal, Card, Deal, DeckRegistry, DeckRules, DeckState, RegistryError, RngState,
    SimulationError,
};

/// Application state, built once at startup and handed to every front end.
#[derive(Debug)]
pub struct DeckBuilder {
    pub rules: DeckRules,
    pub deck: DeckState,
    pub registry: DeckRegistry,
    pub rng: RngState,
}

impl DeckBuilder {
    pub fn new(rules: DeckRules, seed: u64) -> Self {
        Self {
            deck: DeckState::with_rules(&rules),
            registry: DeckRegistry::with_rules(&rules),
            rng: RngState::from_seed(seed),
            rules,
        }
    }

    /// Replaces the active deck, e.g. after a file import.
    pub fn import_into_active(&mut self, cards: Vec<Card>) {
        self.deck.replace_all(cards);
    }

    pub fn add_registry_deck(&mut self, name: &str, cards: Vec<Card>) -> usize {
        self.registry.add_deck(name, cards)
    }

    pub fn activate_registry_deck(&mut self, index: usize) -> Result<(), RegistryError> {
        self.registry.activate(index, &mut self.deck)
    }

    pub fn deal(&mut self) -> Result<Deal, SimulationError> {
        deal(&mut self.deck, &self.rules, &mut self.rng)
    }
}
