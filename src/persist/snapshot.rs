//! Serialized builder state.
//!
//! Field names match the stored JSON document (`baseCounts`, `hand`, ...).
//! Every field has a default so older or partial documents still load.
//! A field that is `null` or of the wrong shape takes its default without
//! affecting the others. Malformed entries of maps and lists are skipped.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::builder::state::BuilderParts;
use crate::builder::{DeckBuilder, SavedDeck};
use crate::cards::{CardCatalog, CardId};
use crate::core::config::DeckRules;
use crate::core::rng::DeckRng;
use crate::deck::{CountMap, DeckConfiguration};
use crate::zones::{DiscardEntry, HandEntry, ZoneState};

/// Persisted form of a [`DeckBuilder`]. The active play is not stored.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    #[serde(deserialize_with = "lenient_counts")]
    pub base_counts: CountMap,
    #[serde(deserialize_with = "lenient_counts")]
    pub mod_counts: CountMap,
    #[serde(deserialize_with = "lenient")]
    pub null_count: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub modifier_capacity: Option<u32>,
    #[serde(deserialize_with = "lenient")]
    pub has_built_deck: bool,
    #[serde(deserialize_with = "lenient")]
    pub has_shuffled_deck: bool,
    #[serde(deserialize_with = "lenient_list")]
    pub deck: Vec<CardId>,
    #[serde(deserialize_with = "lenient_list")]
    pub hand: Vec<HandEntry>,
    #[serde(deserialize_with = "lenient_list")]
    pub discard: Vec<DiscardEntry>,
    #[serde(deserialize_with = "lenient")]
    pub is_locked: bool,
    #[serde(deserialize_with = "lenient")]
    pub deck_name: String,
    #[serde(deserialize_with = "lenient_saved_decks")]
    pub saved_decks: BTreeMap<String, SavedDeck>,
    #[serde(deserialize_with = "lenient")]
    pub hand_limit: Option<usize>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_else(|err| {
        log::debug!("Snapshot field reset to default: {err}");
        T::default()
    }))
}

fn lenient_counts<'de, D>(deserializer: D) -> Result<CountMap, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(CountMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(id, v)| {
            let n = v.as_u64().and_then(|n| u32::try_from(n).ok())?;
            Some((CardId::new(id), n))
        })
        .collect())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

fn lenient_saved_decks<'de, D>(deserializer: D) -> Result<BTreeMap<String, SavedDeck>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(map) = Value::deserialize(deserializer)? else {
        return Ok(BTreeMap::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(name, v)| serde_json::from_value(v).ok().map(|deck| (name, deck)))
        .collect())
}

impl Snapshot {
    /// Rebuild a builder from this snapshot.
    ///
    /// Counts are merged over catalog zeros with unknown ids dropped, the
    /// null count is clamped at the minimum, the hand limit is clamped at
    /// the rules' maximum, and missing scalars take the rules' defaults.
    #[must_use]
    pub fn restore(self, catalog: Arc<CardCatalog>, rules: DeckRules, rng: DeckRng) -> DeckBuilder {
        let config = DeckConfiguration::restore(
            &catalog,
            &rules,
            &self.base_counts,
            &self.mod_counts,
            self.null_count,
            self.modifier_capacity,
        );
        let hand_limit = self
            .hand_limit
            .unwrap_or(rules.default_hand_limit)
            .min(rules.max_hand_limit);
        let parts = BuilderParts {
            config,
            zones: ZoneState {
                library: self.deck,
                hand: self.hand,
                discard: self.discard,
            },
            is_locked: self.is_locked,
            has_built_deck: self.has_built_deck,
            has_shuffled_deck: self.has_shuffled_deck,
            hand_limit,
            deck_name: self.deck_name,
            saved_decks: self.saved_decks,
        };
        DeckBuilder::from_parts(catalog, rules, rng, parts)
    }
}

impl DeckBuilder {
    /// Capture the persistable state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let config = self.config();
        let zones = self.zones();
        Snapshot {
            base_counts: config.base_counts.clone(),
            mod_counts: config.mod_counts.clone(),
            null_count: Some(config.null_count),
            modifier_capacity: Some(config.modifier_capacity),
            has_built_deck: self.has_built_deck(),
            has_shuffled_deck: self.has_shuffled_deck(),
            deck: zones.library.clone(),
            hand: zones.hand.clone(),
            discard: zones.discard.clone(),
            is_locked: self.is_locked(),
            deck_name: self.deck_name().to_string(),
            saved_decks: self.saved_decks().clone(),
            hand_limit: Some(self.hand_limit()),
        }
    }
}
