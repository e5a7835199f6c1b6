use crate::Card;
use serde::Serialize;

/// What a deck mutation did. Listeners get this after the change is
/// applied, together with the resulting card sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum DeckChange {
    Added { index: usize },
    Removed { index: usize },
    Restored { index: usize },
    Cleared,
    Replaced { len: usize },
    Sorted,
    Shuffled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type Listener = Box<dyn FnMut(&DeckChange, &[Card])>;

#[derive(Default)]
pub struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry, _)| *entry != id);
        self.entries.len() != before
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn notify(&mut self, change: &DeckChange, cards: &[Card]) {
        for (_, listener) in &mut self.entries {
            listener(change, cards);
        }
    }
}

impl std::fmt::Debug for Listeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Listeners")
            .field("count", &self.entries.len())
            .finish()
    }
}
