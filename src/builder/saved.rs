//! Named deck saves kept alongside the builder state.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::deck::{CountMap, DeckConfiguration};

/// A configuration saved under a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedDeck {
    pub name: String,
    /// Library at save time.
    #[serde(default)]
    pub deck: Vec<CardId>,
    #[serde(default)]
    pub base_counts: CountMap,
    #[serde(default)]
    pub mod_counts: CountMap,
    #[serde(default)]
    pub null_count: u32,
    #[serde(default)]
    pub modifier_capacity: u32,
    #[serde(default)]
    pub created_at: String,
}

impl SavedDeck {
    pub fn new(
        name: impl Into<String>,
        config: &DeckConfiguration,
        deck: Vec<CardId>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            deck,
            base_counts: config.base_counts.clone(),
            mod_counts: config.mod_counts.clone(),
            null_count: config.null_count,
            modifier_capacity: config.modifier_capacity,
            created_at: created_at.into(),
        }
    }
}
