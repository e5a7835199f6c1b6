use serde::{Deserialize, Serialize};

pub use deckhand_core::{Card, CardImages, CardSet, Category, DeckRules};

/// Reduced deck file read by the companion scanner app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionDeck {
    pub name: String,
    pub cards: Vec<CompanionCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanionCard {
    pub name: String,
    pub image_url: String,
    #[serde(rename = "qrCodeId")]
    pub qr_code_id: String,
}

/// Payload understood by the virtual tabletop viewer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableDeck {
    pub cards: Vec<TableCard>,
    pub back_image_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCard {
    pub front_image_url: String,
    pub name: String,
}

/// Catalog response envelope: `{"data": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogPage<T> {
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub endpoint: String,
    pub back_image_url: String,
    /// Links longer than this are flagged so the caller can ask first.
    pub max_url_len: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://table.c0di.com".to_string(),
            back_image_url: "https://images.pokemontcg.io/cardback.png".to_string(),
            max_url_len: 20_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub api_base_url: String,
    pub page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.pokemontcg.io/v2".to_string(),
            page_size: 20,
        }
    }
}

/// Everything a front end can override from a config file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub rules: DeckRules,
    pub table: TableConfig,
    pub catalog: CatalogConfig,
}
