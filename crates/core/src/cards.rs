use crate::PriceTable;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Catalog exports sometimes write `null` where a field is simply absent.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Coarse card classification, parsed once from the catalog `supertype`.
///
/// Creature, modifier and resource correspond to the catalog's "Pokémon",
/// "Trainer" and "Energy" supertypes. Anything else is kept verbatim so it
/// survives an export.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Creature,
    Modifier,
    Resource,
    Unknown(String),
}

impl Category {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pokémon" | "pokemon" => Self::Creature,
            "trainer" => Self::Modifier,
            "energy" => Self::Resource,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Creature => "Pokémon",
            Self::Modifier => "Trainer",
            Self::Resource => "Energy",
            Self::Unknown(raw) => raw,
        }
    }

    /// True when the record carried no supertype at all.
    pub fn is_unset(&self) -> bool {
        matches!(self, Self::Unknown(raw) if raw.is_empty())
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        match value {
            Category::Unknown(raw) => raw,
            known => known.label().to_string(),
        }
    }
}

/// Element types in canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Element {
    Grass,
    Water,
    Fire,
    Lightning,
    Colorless,
    Darkness,
    Metal,
    Dragon,
    Psychic,
}

impl Element {
    pub fn from_name(name: &str) -> Option<Self> {
        let element = match name.trim().to_lowercase().as_str() {
            "grass" => Self::Grass,
            "water" => Self::Water,
            "fire" => Self::Fire,
            "lightning" => Self::Lightning,
            "colorless" => Self::Colorless,
            "darkness" => Self::Darkness,
            "metal" => Self::Metal,
            "dragon" => Self::Dragon,
            "psychic" => Self::Psychic,
            _ => return None,
        };
        Some(element)
    }
}

/// Evolution stage, most evolved first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stage {
    Stage2,
    Stage1,
    Basic,
}

/// Modifier subtypes in display order: class, item, equipment and location
/// effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ModifierKind {
    Supporter,
    Item,
    Tool,
    Stadium,
}

impl ModifierKind {
    pub fn from_name(name: &str) -> Option<Self> {
        let kind = match name.trim().to_lowercase().as_str() {
            "supporter" => Self::Supporter,
            "item" => Self::Item,
            "pokemon tool" | "pokémon tool" => Self::Tool,
            "stadium" => Self::Stadium,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    #[serde(
        default,
        rename = "releaseDate",
        skip_serializing_if = "Option::is_none"
    )]
    pub release_date: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardImages {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub small: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub large: Option<String>,
}

impl CardImages {
    pub fn both(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            small: Some(url.clone()),
            large: Some(url),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TcgPlayer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub prices: PriceTable,
}

/// Identity of a physical card: name, collector number and set id.
///
/// Missing number or set id compare as their own value, so two cards that
/// both lack a number are equal only when name and set id match too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    pub name: String,
    pub number: Option<String>,
    pub set_id: Option<String>,
}

/// A catalog card record. Fields the engine does not interpret are kept in
/// `extra` and written back unchanged on export.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set: Option<CardSet>,
    #[serde(
        default,
        rename = "supertype",
        deserialize_with = "null_as_default",
        skip_serializing_if = "Category::is_unset"
    )]
    pub category: Category,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub subtypes: Vec<String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub images: CardImages,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tcgplayer: Option<TcgPlayer>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Card {
    pub fn new(name: impl Into<String>, category: Category) -> Self {
        Self {
            name: name.into(),
            category,
            ..Self::default()
        }
    }

    pub fn with_number(mut self, number: impl Into<String>) -> Self {
        self.number = Some(number.into());
        self
    }

    pub fn with_set(mut self, id: impl Into<String>, name: impl Into<String>) -> Self {
        self.set = Some(CardSet {
            id: Some(id.into()),
            name: Some(name.into()),
            ..CardSet::default()
        });
        self
    }

    pub fn with_subtypes(mut self, subtypes: &[&str]) -> Self {
        self.subtypes = subtypes.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types = types.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_images(mut self, images: CardImages) -> Self {
        self.images = images;
        self
    }

    pub fn with_tcgplayer(mut self, tcgplayer: TcgPlayer) -> Self {
        self.tcgplayer = Some(tcgplayer);
        self
    }

    pub fn set_id(&self) -> Option<&str> {
        self.set.as_ref().and_then(|set| set.id.as_deref())
    }

    pub fn set_name(&self) -> Option<&str> {
        self.set.as_ref().and_then(|set| set.name.as_deref())
    }

    pub fn key(&self) -> CardKey {
        CardKey {
            name: self.name.clone(),
            number: self.number.clone(),
            set_id: self.set_id().map(str::to_string),
        }
    }

    pub fn same_identity(&self, other: &Card) -> bool {
        self.name == other.name && self.number == other.number && self.set_id() == other.set_id()
    }

    /// Image for face-up display: small, else large.
    pub fn front_image(&self) -> Option<&str> {
        self.images
            .small
            .as_deref()
            .or(self.images.large.as_deref())
            .filter(|url| !url.is_empty())
    }

    pub fn primary_element(&self) -> Option<Element> {
        self.types.first().and_then(|name| Element::from_name(name))
    }

    /// `None` when the card carries a stage subtype that is not recognised.
    pub fn stage(&self) -> Option<Stage> {
        let Some(stage) = self
            .subtypes
            .iter()
            .map(|s| s.to_lowercase())
            .find(|s| s.contains("stage"))
        else {
            return Some(Stage::Basic);
        };
        match stage.as_str() {
            "stage 2" => Some(Stage::Stage2),
            "stage 1" => Some(Stage::Stage1),
            _ => None,
        }
    }

    pub fn modifier_kind(&self) -> Option<ModifierKind> {
        self.subtypes
            .first()
            .and_then(|name| ModifierKind::from_name(name))
    }

    /// Basic resources are named after their element ("Fire Energy").
    pub fn resource_element(&self) -> Option<Element> {
        if !self.subtypes.iter().any(|s| s == "Basic") {
            return None;
        }
        self.name
            .split(' ')
            .next()
            .and_then(Element::from_name)
    }
}
