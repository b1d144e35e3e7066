//! Zone state: library, hand and discard.
//!
//! - `library` is a stack: index 0 is the bottom, the last element is the top.
//! - `hand` is ordered and bounded by the hand limit.
//! - `discard` is ordered; each entry remembers how it got there.

use serde::{Deserialize, Serialize};

use crate::cards::CardId;
use crate::deck::CountMap;

/// Status of a card in hand.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HandStatus {
    #[default]
    Unspent,
    Played,
}

/// How a card reached the discard pile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscardOrigin {
    /// Committed as part of a play.
    Played,
    /// Discarded directly (or milled from the library).
    #[default]
    Discarded,
}

/// A card in hand.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandEntry {
    pub id: CardId,
    #[serde(rename = "state", default)]
    pub status: HandStatus,
}

impl HandEntry {
    /// An unspent hand entry.
    pub fn unspent(id: impl Into<CardId>) -> Self {
        Self {
            id: id.into(),
            status: HandStatus::Unspent,
        }
    }
}

/// A card in the discard pile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscardEntry {
    pub id: CardId,
    #[serde(default)]
    pub origin: DiscardOrigin,
}

impl DiscardEntry {
    pub fn new(id: impl Into<CardId>, origin: DiscardOrigin) -> Self {
        Self {
            id: id.into(),
            origin,
        }
    }
}

/// The three zones of a deck in play.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneState {
    pub library: Vec<CardId>,
    pub hand: Vec<HandEntry>,
    pub discard: Vec<DiscardEntry>,
}

impl ZoneState {
    /// Create empty zones.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty every zone.
    pub fn clear(&mut self) {
        self.library.clear();
        self.hand.clear();
        self.discard.clear();
    }

    /// Are all three zones empty?
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.library.is_empty() && self.hand.is_empty() && self.discard.is_empty()
    }

    /// Top card of the library.
    #[must_use]
    pub fn top_card(&self) -> Option<&CardId> {
        self.library.last()
    }

    /// Free hand slots under `hand_limit`.
    #[must_use]
    pub fn hand_space(&self, hand_limit: usize) -> usize {
        hand_limit.saturating_sub(self.hand.len())
    }

    /// Copies of each id in hand.
    #[must_use]
    pub fn hand_counts(&self) -> CountMap {
        group_counts(self.hand.iter().map(|h| &h.id))
    }

    /// Copies of each id in discard.
    #[must_use]
    pub fn discard_counts(&self) -> CountMap {
        group_counts(self.discard.iter().map(|d| &d.id))
    }

    /// Multiset of every id across the three zones.
    #[must_use]
    pub fn all_counts(&self) -> CountMap {
        group_counts(
            self.library
                .iter()
                .chain(self.hand.iter().map(|h| &h.id))
                .chain(self.discard.iter().map(|d| &d.id)),
        )
    }

    /// Total number of cards across the three zones.
    #[must_use]
    pub fn total_cards(&self) -> usize {
        self.library.len() + self.hand.len() + self.discard.len()
    }
}

/// Count occurrences of each id.
pub fn group_counts<'a>(ids: impl IntoIterator<Item = &'a CardId>) -> CountMap {
    let mut counts = CountMap::new();
    for id in ids {
        *counts.entry(id.clone()).or_insert(0) += 1;
    }
    counts
}

/// How many of `available` cards can return to a hand of `hand_len`
/// cards without exceeding `hand_limit`.
#[must_use]
pub fn returnable_count(hand_len: usize, hand_limit: usize, available: usize) -> usize {
    hand_limit.saturating_sub(hand_len).min(available)
}
