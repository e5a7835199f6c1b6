use crate::schema::{TableCard, TableConfig, TableDeck};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use deckhand_core::Card;
use thiserror::Error;
use tracing::warn;

const UNKNOWN_CARD_NAME: &str = "Unknown Card";

#[derive(Debug, Error)]
pub enum TableError {
    #[error("deck is empty")]
    EmptyDeck,
    #[error("no cards with images in deck")]
    NoImages,
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLink {
    pub url: String,
    pub card_count: usize,
    pub skipped: usize,
    /// Long enough that some browsers may refuse it.
    pub oversized: bool,
}

/// Cards without a front image are left out.
pub fn table_deck(cards: &[Card], config: &TableConfig) -> TableDeck {
    let cards = cards
        .iter()
        .filter_map(|card| {
            let front = card.front_image()?;
            let name = if card.name.is_empty() {
                UNKNOWN_CARD_NAME
            } else {
                card.name.as_str()
            };
            Some(TableCard {
                front_image_url: front.to_string(),
                name: name.to_string(),
            })
        })
        .collect();
    TableDeck {
        cards,
        back_image_url: config.back_image_url.clone(),
    }
}

/// JSON, then unpadded URL-safe base64.
pub fn encode_table_deck(deck: &TableDeck) -> Result<String, TableError> {
    let json = serde_json::to_vec(deck)?;
    Ok(URL_SAFE_NO_PAD.encode(json))
}

pub fn table_link(cards: &[Card], config: &TableConfig) -> Result<TableLink, TableError> {
    if cards.is_empty() {
        return Err(TableError::EmptyDeck);
    }
    let deck = table_deck(cards, config);
    if deck.cards.is_empty() {
        return Err(TableError::NoImages);
    }
    let skipped = cards.len() - deck.cards.len();
    if skipped > 0 {
        warn!(skipped, "cards without images left out of tabletop deck");
    }
    let url = format!("{}?deck={}", config.endpoint, encode_table_deck(&deck)?);
    let oversized = url.len() > config.max_url_len;
    if oversized {
        warn!(len = url.len(), "tabletop link is very long");
    }
    Ok(TableLink {
        url,
        card_count: deck.cards.len(),
        skipped,
        oversized,
    })
}
