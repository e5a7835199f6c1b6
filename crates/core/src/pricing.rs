use crate::Card;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mid: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub high: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direct_low: Option<f64>,
}

impl PricePoints {
    /// Market, then mid, then low. Missing or zero values fall through.
    pub fn preferred(&self) -> Option<f64> {
        [self.market, self.mid, self.low]
            .into_iter()
            .flatten()
            .find(|value| *value != 0.0 && !value.is_nan())
    }
}

/// Finish name to price points, in the order the source listed them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    entries: Vec<(String, PricePoints)>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, finish: impl Into<String>, points: PricePoints) -> Self {
        self.entries.push((finish.into(), points));
        self
    }

    pub fn first(&self) -> Option<(&str, &PricePoints)> {
        self.entries
            .first()
            .map(|(finish, points)| (finish.as_str(), points))
    }

    pub fn get(&self, finish: &str) -> Option<&PricePoints> {
        self.entries
            .iter()
            .find(|(name, _)| name == finish)
            .map(|(_, points)| points)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Serialize for PriceTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (finish, points) in &self.entries {
            map.serialize_entry(finish, points)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PriceTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = PriceTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of finish names to price points")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<PriceTable, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((finish, points)) = access.next_entry::<String, PricePoints>()? {
                    entries.push((finish, points));
                }
                Ok(PriceTable { entries })
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<PriceTable, E> {
                Ok(PriceTable::default())
            }
        }

        deserializer.deserialize_any(TableVisitor)
    }
}

/// A resolved price with the finish it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceQuote {
    pub amount: f64,
    pub finish: String,
    pub updated_at: Option<String>,
}

impl Card {
    /// Only the first listed finish is consulted; a card whose first finish
    /// has no usable value is unpriced even if later finishes have one.
    pub fn price(&self) -> Option<PriceQuote> {
        let tcgplayer = self.tcgplayer.as_ref()?;
        let (finish, points) = tcgplayer.prices.first()?;
        let amount = points.preferred()?;
        Some(PriceQuote {
            amount,
            finish: finish.to_string(),
            updated_at: tcgplayer.updated_at.clone(),
        })
    }

    pub fn price_or_zero(&self) -> f64 {
        self.price().map(|quote| quote.amount).unwrap_or(0.0)
    }
}

pub fn total_price<'a>(cards: impl IntoIterator<Item = &'a Card>) -> f64 {
    cards.into_iter().map(Card::price_or_zero).sum()
}
