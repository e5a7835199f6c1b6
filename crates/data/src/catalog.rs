//! Search query construction and pagination for the remote card catalog.
//!
//! The transport is not part of this crate: anything that can answer a
//! [`SearchRequest`] implements [`Catalog`].

use crate::schema::{CatalogConfig, CatalogPage};
use deckhand_core::{Card, CardSet, Category};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::{debug, warn};

const NEWEST_FIRST: &str = "-set.releaseDate";
/// How many sets `recent_sets` suggests by default.
pub const RECENT_SET_COUNT: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    Request(String),
    #[error("malformed catalog response: {0}")]
    Response(String),
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Response(value.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardFilters {
    pub category: Option<Category>,
    /// Only applied together with the modifier category.
    pub modifier_subtype: Option<String>,
    /// Only applied together with the creature category.
    pub creature_element: Option<String>,
    /// Only applied together with the creature category.
    pub creature_stage: Option<String>,
    /// Applied regardless of category.
    pub element: Option<String>,
    /// Reorders each returned page by price; the query is unchanged.
    pub price_sort: Option<PriceSort>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSort {
    /// Cheapest first.
    Low,
    /// Most expensive first.
    High,
}

/// Print family of a search result, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Variant {
    Regular,
    FullArt,
    Ex,
    Gx,
    V,
    Vstar,
    Vmax,
    Mega,
    PrismStar,
    AceSpec,
}

impl Variant {
    /// Classifies by substring of the lowercased name, checked from the
    /// most specific marker down. Any name containing a `v` counts as V.
    pub fn of(card: &Card) -> Self {
        let name = card.name.to_lowercase();
        if name.contains("vmax") {
            Self::Vmax
        } else if name.contains("vstar") {
            Self::Vstar
        } else if name.contains("gx") {
            Self::Gx
        } else if name.contains("ex") {
            Self::Ex
        } else if name.contains("mega") {
            Self::Mega
        } else if name.contains("prism star") || name.contains('♢') {
            Self::PrismStar
        } else if name.contains("ace spec") {
            Self::AceSpec
        } else if name.contains('v') {
            Self::V
        } else if name.contains("full art")
            || card.subtypes.iter().any(|s| s.eq_ignore_ascii_case("full art"))
        {
            Self::FullArt
        } else {
            Self::Regular
        }
    }
}

/// Stable, so API order survives within a variant.
pub fn sort_by_variant(cards: &mut [Card]) {
    cards.sort_by_key(Variant::of);
}

/// Unpriced cards count as zero.
pub fn sort_by_price(cards: &mut [Card], order: PriceSort) {
    cards.sort_by(|a, b| {
        let ascending = a.price_or_zero().total_cmp(&b.price_or_zero());
        match order {
            PriceSort::Low => ascending,
            PriceSort::High => ascending.reverse(),
        }
    });
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub page: u32,
    pub page_size: u32,
    pub order_by: Option<String>,
}

impl SearchRequest {
    /// Unencoded request URL; the transport is responsible for escaping.
    pub fn url(&self, base: &str) -> String {
        let mut url = format!("{base}/cards?q={}", self.query);
        if let Some(order) = &self.order_by {
            url.push_str(&format!("&orderBy={order}"));
        }
        url.push_str(&format!("&page={}&pageSize={}", self.page, self.page_size));
        url
    }
}

pub trait Catalog {
    fn search(&mut self, request: &SearchRequest) -> Result<Vec<Card>, CatalogError>;
    fn list_sets(&mut self) -> Result<Vec<CardSet>, CatalogError>;
}

/// Parses a `{"data": [...]}` card page.
pub fn parse_card_page(body: &str) -> Result<Vec<Card>, CatalogError> {
    let page: CatalogPage<Card> = serde_json::from_str(body)?;
    Ok(page.data)
}

pub fn parse_set_list(body: &str) -> Result<Vec<CardSet>, CatalogError> {
    let page: CatalogPage<CardSet> = serde_json::from_str(body)?;
    Ok(page.data)
}

fn special_query(query: &str) -> Option<&'static str> {
    let found = if query.starts_with("$V") && !query.contains("$VMAX") && !query.contains("$VSTAR")
    {
        r#"(name:"*-V" OR name:"* V" OR name:" V " OR subtypes:"V" OR name:" V") -name:"VMAX" -name:"VSTAR""#
    } else if query.starts_with("$GX") {
        r#"(name:"*-GX" OR name:"* GX" OR name:" GX " OR subtypes:"GX")"#
    } else if query.starts_with("$EX") {
        r#"(name:"*-EX" OR name:"* EX" OR name:" EX " OR subtypes:"EX")"#
    } else if query.starts_with("$VSTAR") {
        r#"(name:"*VSTAR*" OR subtypes:"VSTAR")"#
    } else if query.starts_with("$VMAX") {
        r#"(name:"*VMAX*" OR subtypes:"VMAX")"#
    } else if query.starts_with("$Prism") {
        r#"(name:"*♢*" OR name:"* Prism Star" OR subtypes:"Prism Star")"#
    } else if query.starts_with("$ACESPEC") {
        r#"(name:"*ACE SPEC*" OR subtypes:"ACE SPEC" OR rarity:"ACE SPEC")"#
    } else {
        return None;
    };
    Some(found)
}

/// `sv1-25` splits into set `sv1` and number `25`.
fn split_set_number(raw: &str) -> Option<(&str, &str)> {
    let (set, number) = raw.split_once('-')?;
    let set_ok = !set.is_empty() && set.chars().all(|c| c.is_ascii_alphanumeric());
    let number_ok = !number.is_empty() && number.chars().all(|c| c.is_ascii_digit());
    (set_ok && number_ok).then_some((set, number))
}

fn stage_query(stage: &str) -> String {
    match stage {
        "V" | "VSTAR" | "VMAX" | "EX" | "GX" => {
            special_query(&format!("${stage}")).unwrap_or_default().to_string()
        }
        other => format!(r#"subtypes:"{other}""#),
    }
}

fn category_query(category: &Category) -> Option<&'static str> {
    match category {
        Category::Creature => Some(r#"supertype:"Pokémon""#),
        Category::Modifier => Some(r#"supertype:"Trainer""#),
        Category::Resource => Some(r#"supertype:"Energy""#),
        Category::Unknown(_) => None,
    }
}

fn filter_clauses(filters: &CardFilters) -> Vec<String> {
    let mut clauses = Vec::new();
    if let Some(category) = &filters.category {
        if let Some(clause) = category_query(category) {
            clauses.push(clause.to_string());
        }
        match category {
            Category::Modifier => {
                if let Some(subtype) = &filters.modifier_subtype {
                    clauses.push(format!(r#"subtypes:"{subtype}""#));
                }
            }
            Category::Creature => {
                if let Some(element) = &filters.creature_element {
                    clauses.push(format!(r#"types:"{element}""#));
                }
                if let Some(stage) = &filters.creature_stage {
                    clauses.push(stage_query(stage));
                }
            }
            _ => {}
        }
    }
    if let Some(element) = &filters.element {
        clauses.push(format!(r#"types:"{element}""#));
    }
    clauses
}

/// Turns what the user typed into the catalog's query language.
///
/// `#sv1-25` and `#sv1` search by set id (and number), `@Paldea` by set or
/// series name, `$GX`-style prefixes by card family, anything else by name.
/// Family prefixes ignore the filters.
pub fn build_query(query: &str, filters: &CardFilters) -> String {
    if let Some(special) = special_query(query) {
        return special.to_string();
    }
    let base = if let Some(set) = query.strip_prefix('#') {
        match split_set_number(set) {
            Some((set, number)) => format!(r#"number:"{number}" set.id:"{set}""#),
            None => format!(r#"set.id:"{set}""#),
        }
    } else if let Some(name) = query.strip_prefix('@') {
        format!(r#"(set.name:"*{name}*" OR set.series:"*{name}*")"#)
    } else if query.is_empty() {
        String::new()
    } else {
        format!(r#"name:"*{query}*""#)
    };
    std::iter::once(base)
        .filter(|clause| !clause.is_empty())
        .chain(filter_clauses(filters))
        .collect::<Vec<_>>()
        .join(" AND ")
}

fn set_priority(card: &Card) -> u8 {
    match card.set_id() {
        Some(id) if id.starts_with("swsh") => 2,
        Some(id) if id.starts_with("sv") => 1,
        Some(id) if id.starts_with("sm") => 3,
        Some(id) if id.starts_with("xy") => 4,
        _ => 99,
    }
}

fn newest_first(a: &CardSet, b: &CardSet) -> Ordering {
    b.release_date.cmp(&a.release_date)
}

/// Catalog set dates are `YYYY/MM/DD`, so string order is date order.
pub fn sort_sets_newest_first(sets: &mut [CardSet]) {
    sets.sort_by(newest_first);
}

fn contains_ignore_case(field: Option<&str>, needle: &str) -> bool {
    field.unwrap_or_default().to_lowercase().contains(needle)
}

/// First set whose name or series contains `name`, ignoring case.
pub fn find_set_by_name<'a>(sets: &'a [CardSet], name: &str) -> Option<&'a CardSet> {
    let needle = name.to_lowercase();
    sets.iter().find(|set| {
        contains_ignore_case(set.name.as_deref(), &needle)
            || contains_ignore_case(set.series.as_deref(), &needle)
    })
}

pub fn recent_sets(sets: &[CardSet], count: usize) -> Vec<&CardSet> {
    let mut recent: Vec<&CardSet> = sets.iter().collect();
    recent.sort_by(|a, b| newest_first(a, b));
    recent.truncate(count);
    recent
}

pub fn sets_by_series<'a>(sets: &'a [CardSet], series: &str) -> Vec<&'a CardSet> {
    sets.iter()
        .filter(|set| {
            set.series
                .as_deref()
                .is_some_and(|own| own.to_lowercase() == series.to_lowercase())
        })
        .collect()
}

/// Display order for a page of results: variant first, then price when
/// the filters ask for it.
fn arrange(cards: &mut [Card], filters: &CardFilters) {
    sort_by_variant(cards);
    if let Some(order) = filters.price_sort {
        sort_by_price(cards, order);
    }
}

/// Pagination cursor over a [`Catalog`].
#[derive(Debug)]
pub struct SearchSession<C> {
    catalog: C,
    page_size: u32,
    page: u32,
    has_more: bool,
    last_query: String,
}

impl<C: Catalog> SearchSession<C> {
    pub fn new(catalog: C, config: &CatalogConfig) -> Self {
        Self {
            catalog,
            page_size: config.page_size,
            page: 1,
            has_more: true,
            last_query: String::new(),
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn last_query(&self) -> &str {
        &self.last_query
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Starts a new search from page one. An empty query lists newest
    /// cards, grouped by set family.
    pub fn search(
        &mut self,
        query: &str,
        filters: &CardFilters,
    ) -> Result<Vec<Card>, CatalogError> {
        self.page = 1;
        self.has_more = true;
        self.last_query = query.to_string();
        let browsing = query.is_empty();
        let request = SearchRequest {
            query: build_query(query, filters),
            page: self.page,
            page_size: self.page_size,
            order_by: browsing.then(|| NEWEST_FIRST.to_string()),
        };
        debug!(query = %request.query, "catalog search");
        let mut cards = self.catalog.search(&request).map_err(|err| {
            warn!(%err, "catalog search failed");
            err
        })?;
        self.has_more = cards.len() as u32 == self.page_size;
        if browsing {
            cards.sort_by_key(set_priority);
        }
        arrange(&mut cards, filters);
        Ok(cards)
    }

    /// Next page of the last search. Returns nothing once the catalog has
    /// run out; a failed request leaves the cursor where it was.
    pub fn load_more(&mut self, filters: &CardFilters) -> Result<Vec<Card>, CatalogError> {
        if !self.has_more {
            return Ok(Vec::new());
        }
        self.page += 1;
        let request = SearchRequest {
            query: build_query(&self.last_query, filters),
            page: self.page,
            page_size: self.page_size,
            order_by: None,
        };
        debug!(query = %request.query, page = self.page, "catalog load more");
        match self.catalog.search(&request) {
            Ok(mut cards) => {
                self.has_more = cards.len() as u32 == self.page_size;
                arrange(&mut cards, filters);
                Ok(cards)
            }
            Err(err) => {
                warn!(%err, "catalog load more failed");
                self.page -= 1;
                Err(err)
            }
        }
    }

    pub fn list_sets(&mut self) -> Result<Vec<CardSet>, CatalogError> {
        let mut sets = self.catalog.list_sets()?;
        sort_sets_newest_first(&mut sets);
        Ok(sets)
    }

    pub fn newest_set(&mut self) -> Result<Option<CardSet>, CatalogError> {
        Ok(self.list_sets()?.into_iter().next())
    }
}
