use crate::schema::{CompanionCard, CompanionDeck};
use deckhand_core::{Card, RngState};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::info;

pub const IMPORTED_DECK_NAME: &str = "Imported Deck";
pub const DEFAULT_DECK_NAME: &str = "My Deck";
pub const FULL_EXPORT_FILE_NAME: &str = "deck-full.json";

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid file format: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid file format: expected a card array or a named deck object")]
    InvalidFormat,
    #[error("invalid file format: card {index}: {message}")]
    InvalidCard { index: usize, message: String },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no cards in deck to export")]
    EmptyDeck,
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Which of the two deck file layouts a file used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckFormat {
    /// Bare array of full catalog records.
    Full,
    /// `{name, cards: [{name, image_url, qrCodeId}]}`.
    Companion,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportedDeck {
    pub name: String,
    pub format: DeckFormat,
    pub cards: Vec<Card>,
}

fn companion_parts(map: &Map<String, Value>) -> Option<(&str, &Vec<Value>)> {
    let name = map.get("name")?.as_str().filter(|name| !name.is_empty())?;
    let cards = map.get("cards")?.as_array()?;
    Some((name, cards))
}

/// Companion records only carry `image_url`; give them the `images` object
/// the rest of the code expects.
fn upgrade_companion_record(mut record: Value) -> Value {
    if let Value::Object(map) = &mut record {
        let url = map
            .get("image_url")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(str::to_string);
        let has_images = map.get("images").is_some_and(Value::is_object);
        if let (Some(url), false) = (url, has_images) {
            map.insert("images".to_string(), json!({ "small": url, "large": url }));
        }
    }
    record
}

fn parse_cards(records: Vec<Value>) -> Result<Vec<Card>, ImportError> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record).map_err(|err| ImportError::InvalidCard {
                index,
                message: err.to_string(),
            })
        })
        .collect()
}

/// Parses either deck file layout. Nothing is applied anywhere on failure.
pub fn import_deck(text: &str) -> Result<ImportedDeck, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let imported = match value {
        Value::Object(map) => {
            let Some((name, records)) = companion_parts(&map) else {
                return Err(ImportError::InvalidFormat);
            };
            let records = records.iter().cloned().map(upgrade_companion_record).collect();
            ImportedDeck {
                name: name.to_string(),
                format: DeckFormat::Companion,
                cards: parse_cards(records)?,
            }
        }
        Value::Array(records) => ImportedDeck {
            name: IMPORTED_DECK_NAME.to_string(),
            format: DeckFormat::Full,
            cards: parse_cards(records)?,
        },
        _ => return Err(ImportError::InvalidFormat),
    };
    info!(
        name = %imported.name,
        cards = imported.cards.len(),
        format = ?imported.format,
        "deck imported"
    );
    Ok(imported)
}

pub fn export_full(cards: &[Card]) -> Result<String, ExportError> {
    if cards.is_empty() {
        return Err(ExportError::EmptyDeck);
    }
    Ok(serde_json::to_string_pretty(cards)?)
}

/// Builds the companion layout. Each card gets an opaque
/// `card_<stamp>_<index>_<token>` id.
pub fn companion_deck(name: &str, cards: &[Card], stamp: u64, rng: &mut RngState) -> CompanionDeck {
    let name = if name.trim().is_empty() {
        DEFAULT_DECK_NAME
    } else {
        name
    };
    let cards = cards
        .iter()
        .enumerate()
        .map(|(index, card)| CompanionCard {
            name: card.name.clone(),
            image_url: card.images.small.clone().unwrap_or_default(),
            qr_code_id: format!("card_{stamp}_{index}_{}", rng.base36_token(9)),
        })
        .collect();
    CompanionDeck {
        name: name.to_string(),
        cards,
    }
}

pub fn export_companion(
    name: &str,
    cards: &[Card],
    stamp: u64,
    rng: &mut RngState,
) -> Result<String, ExportError> {
    if cards.is_empty() {
        return Err(ExportError::EmptyDeck);
    }
    let deck = companion_deck(name, cards, stamp, rng);
    info!(name = %deck.name, cards = deck.cards.len(), "companion deck exported");
    Ok(serde_json::to_string_pretty(&deck)?)
}

/// `My Fire Deck` becomes `my_fire_deck-qr-deck.json`.
pub fn companion_file_name(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{stem}-qr-deck.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand_core::{CardImages, Category};

    #[test]
    fn companion_import_upgrades_image_url() {
        let text = r#"{"name":"X","cards":[{"name":"Pikachu","image_url":"http://x/y.png","qrCodeId":"q1"}]}"#;
        let deck = import_deck(text).expect("import");
        assert_eq!(deck.name, "X");
        assert_eq!(deck.format, DeckFormat::Companion);
        let card = &deck.cards[0];
        assert_eq!(card.name, "Pikachu");
        assert_eq!(card.images.small.as_deref(), Some("http://x/y.png"));
        assert_eq!(card.images.large.as_deref(), Some("http://x/y.png"));
        assert_eq!(card.extra.get("qrCodeId"), Some(&Value::from("q1")));
    }

    #[test]
    fn companion_import_keeps_existing_images() {
        let text = r#"{"name":"X","cards":[{"name":"P","image_url":"a.png","images":{"small":"s.png"}}]}"#;
        let deck = import_deck(text).expect("import");
        assert_eq!(deck.cards[0].images.small.as_deref(), Some("s.png"));
        assert_eq!(deck.cards[0].images.large, None);
    }

    #[test]
    fn companion_import_upgrades_null_images() {
        let text = r#"{"name":"X","cards":[{"name":"P","image_url":"a.png","images":null}]}"#;
        let deck = import_deck(text).expect("import");
        assert_eq!(deck.cards[0].images, CardImages::both("a.png"));
    }

    #[test]
    fn full_import_accepts_null_fields() {
        let text = r#"[{"name":"Potion","supertype":null,"images":null,"subtypes":null,"types":null}]"#;
        let deck = import_deck(text).expect("import");
        assert_eq!(deck.format, DeckFormat::Full);
        assert!(deck.cards[0].category.is_unset());
        assert_eq!(deck.cards[0].images, CardImages::default());
    }

    #[test]
    fn bare_array_is_full_schema() {
        let text = r#"[{"name":"Pikachu","supertype":"Pokémon","number":"25","set":{"id":"sv1"}}]"#;
        let deck = import_deck(text).expect("import");
        assert_eq!(deck.format, DeckFormat::Full);
        assert_eq!(deck.name, IMPORTED_DECK_NAME);
        assert_eq!(deck.cards[0].category, Category::Creature);
    }

    #[test]
    fn rejects_other_shapes() {
        for text in [
            r#"{"cards":[]}"#,
            r#"{"name":"","cards":[]}"#,
            r#"{"name":"X","cards":{}}"#,
            r#""deck""#,
            "42",
        ] {
            assert!(
                matches!(import_deck(text), Err(ImportError::InvalidFormat)),
                "{text}"
            );
        }
        assert!(matches!(import_deck("not json"), Err(ImportError::Parse(_))));
        assert!(matches!(
            import_deck("[1, 2]"),
            Err(ImportError::InvalidCard { index: 0, .. })
        ));
    }

    #[test]
    fn full_export_round_trips() {
        let cards = vec![
            Card::new("Pikachu", Category::Creature)
                .with_number("25")
                .with_set("sv1", "Scarlet & Violet")
                .with_images(CardImages::both("p.png")),
            Card::new("Potion", Category::Modifier).with_subtypes(&["Item"]),
        ];
        let text = export_full(&cards).expect("export");
        let back = import_deck(&text).expect("import");
        assert_eq!(back.cards, cards);
    }

    #[test]
    fn empty_exports_fail() {
        let mut rng = RngState::from_seed(1);
        assert!(matches!(export_full(&[]), Err(ExportError::EmptyDeck)));
        assert!(matches!(
            export_companion("x", &[], 0, &mut rng),
            Err(ExportError::EmptyDeck)
        ));
    }

    #[test]
    fn companion_export_shape() {
        let cards = vec![
            Card::new("Pikachu", Category::Creature).with_images(CardImages::both("p.png")),
            Card::new("Nameless", Category::Creature),
        ];
        let deck = companion_deck("", &cards, 1700, &mut RngState::from_seed(5));
        assert_eq!(deck.name, DEFAULT_DECK_NAME);
        assert_eq!(deck.cards[0].image_url, "p.png");
        assert_eq!(deck.cards[1].image_url, "");
        assert!(deck.cards[0].qr_code_id.starts_with("card_1700_0_"));
        assert_eq!(deck.cards[1].qr_code_id.len(), "card_1700_1_".len() + 9);

        let text = export_companion("Sparky", &cards, 1700, &mut RngState::from_seed(5))
            .expect("export");
        let back = import_deck(&text).expect("import");
        assert_eq!(back.name, "Sparky");
        assert_eq!(back.cards[0].images, CardImages::both("p.png"));
    }

    #[test]
    fn companion_file_names() {
        assert_eq!(companion_file_name("My Fire Deck!"), "my_fire_deck_-qr-deck.json");
    }
}
