//! Card catalog for definition lookup.
//!
//! The `CardCatalog` stores the three card pools (base, modifier, null)
//! supplied by the handbook. The engine treats it as read-only data:
//! it is built once at startup and only queried afterwards.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{Card, CardId, CardKind};
use crate::core::error::{DeckError, DeckResult};
use crate::deck::CountMap;

/// Pool a catalog card belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CardCategory {
    Base,
    Mod,
    Null,
}

impl CardCategory {
    fn default_kind(self) -> CardKind {
        match self {
            CardCategory::Base => CardKind::Base,
            CardCategory::Mod => CardKind::Mod,
            CardCategory::Null => CardKind::Null,
        }
    }
}

/// Catalog of base, modifier and null cards.
///
/// Pools keep their registration order; that order is the canonical
/// order used when a fresh configuration is created.
///
/// ## Example
///
/// ```
/// use engram_deck::cards::{Card, CardCatalog};
///
/// let catalog = CardCatalog::new()
///     .with_base(Card::new("b1", "Strike"))
///     .with_mod(Card::new("m1", "Rewire").with_cost(2))
///     .with_null(Card::new("null", "Static"));
///
/// assert!(catalog.is_base("b1"));
/// assert_eq!(catalog.cost_of("m1"), 2);
/// assert_eq!(catalog.null_id().map(|id| id.as_str()), Some("null"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    base: Vec<Card>,
    mods: Vec<Card>,
    nulls: Vec<Card>,
    index: FxHashMap<CardId, (CardCategory, usize)>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Handbook {
    #[serde(default)]
    base_cards: Vec<Card>,
    #[serde(default)]
    mod_cards: Vec<Card>,
    #[serde(default)]
    null_cards: Vec<Card>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a handbook JSON document:
    /// `{ "baseCards": [...], "modCards": [...], "nullCards": [...] }`.
    ///
    /// Duplicate ids across all pools are rejected.
    pub fn from_json(json: &str) -> DeckResult<Self> {
        let handbook: Handbook = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        let pools = [
            (CardCategory::Base, handbook.base_cards),
            (CardCategory::Mod, handbook.mod_cards),
            (CardCategory::Null, handbook.null_cards),
        ];
        for (category, cards) in pools {
            for card in cards {
                if catalog.contains(card.id.as_str()) {
                    return Err(DeckError::invalid_format(format!(
                        "duplicate card id '{}'",
                        card.id
                    )));
                }
                catalog.register(category, card);
            }
        }

        log::debug!(
            "Loaded catalog: {} base, {} mod, {} null",
            catalog.base.len(),
            catalog.mods.len(),
            catalog.nulls.len()
        );
        Ok(catalog)
    }

    /// Register a card in a pool.
    ///
    /// Cards without a type tag take the pool's tag.
    /// Panics if a card with the same ID already exists.
    pub fn register(&mut self, category: CardCategory, mut card: Card) {
        if self.index.contains_key(&card.id) {
            panic!("Card with ID {:?} already registered", card.id);
        }
        if card.kind.is_none() {
            card.kind = Some(category.default_kind());
        }

        let pool = self.pool_mut(category);
        let slot = pool.len();
        let id = card.id.clone();
        pool.push(card);
        self.index.insert(id, (category, slot));
    }

    /// Add a base card (builder pattern).
    #[must_use]
    pub fn with_base(mut self, card: Card) -> Self {
        self.register(CardCategory::Base, card);
        self
    }

    /// Add a modifier card (builder pattern).
    #[must_use]
    pub fn with_mod(mut self, card: Card) -> Self {
        self.register(CardCategory::Mod, card);
        self
    }

    /// Add a null card (builder pattern).
    #[must_use]
    pub fn with_null(mut self, card: Card) -> Self {
        self.register(CardCategory::Null, card);
        self
    }

    fn pool_mut(&mut self, category: CardCategory) -> &mut Vec<Card> {
        match category {
            CardCategory::Base => &mut self.base,
            CardCategory::Mod => &mut self.mods,
            CardCategory::Null => &mut self.nulls,
        }
    }

    fn pool(&self, category: CardCategory) -> &[Card] {
        match category {
            CardCategory::Base => &self.base,
            CardCategory::Mod => &self.mods,
            CardCategory::Null => &self.nulls,
        }
    }

    /// Base cards in registration order.
    #[must_use]
    pub fn base_cards(&self) -> &[Card] {
        &self.base
    }

    /// Modifier cards in registration order.
    #[must_use]
    pub fn mod_cards(&self) -> &[Card] {
        &self.mods
    }

    /// Null cards in registration order.
    #[must_use]
    pub fn null_cards(&self) -> &[Card] {
        &self.nulls
    }

    /// Look up a card in any pool.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Card> {
        let &(category, slot) = self.index.get(id)?;
        self.pool(category).get(slot)
    }

    /// Pool of a card id.
    #[must_use]
    pub fn category(&self, id: &str) -> Option<CardCategory> {
        self.index.get(id).map(|&(category, _)| category)
    }

    /// Check if a card ID is registered in any pool.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    #[must_use]
    pub fn is_base(&self, id: &str) -> bool {
        self.category(id) == Some(CardCategory::Base)
    }

    #[must_use]
    pub fn is_mod(&self, id: &str) -> bool {
        self.category(id) == Some(CardCategory::Mod)
    }

    /// The designated null card: the first registered null.
    #[must_use]
    pub fn null_card(&self) -> Option<&Card> {
        self.nulls.first()
    }

    /// Id of the designated null card.
    #[must_use]
    pub fn null_id(&self) -> Option<&CardId> {
        self.null_card().map(|c| &c.id)
    }

    /// Capacity cost of a card; unknown cards and absent costs are 0.
    #[must_use]
    pub fn cost_of(&self, id: &str) -> u32 {
        self.get(id).map_or(0, Card::cost_or_zero)
    }

    /// Cost table covering every card in the catalog.
    #[must_use]
    pub fn costs(&self) -> CountMap {
        self.base
            .iter()
            .chain(&self.mods)
            .chain(&self.nulls)
            .map(|c| (c.id.clone(), c.cost_or_zero()))
            .collect()
    }

    /// Total number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
