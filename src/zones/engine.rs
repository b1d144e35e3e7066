//! Zone transitions.
//!
//! Every transition either applies or returns a refusal and leaves the
//! zones untouched. Cards are only relocated; no transition here creates
//! or destroys a card, except the explicit materialization paths
//! (`reset` and the draw from fully empty zones).
//!
//! Lock and build preconditions are checked by
//! [`DeckBuilder`](crate::builder::DeckBuilder); these methods only know
//! about zones and the hand limit.

use super::state::{DiscardEntry, DiscardOrigin, HandEntry, ZoneState};
use crate::cards::CardId;
use crate::core::outcome::{Limit, Outcome, Precondition};
use crate::core::rng::DeckRng;
use crate::deck::DeckConfiguration;

/// Expand a configuration into a flat list of ids, one per copy.
///
/// Order is deterministic: base counts, then modifier counts (each in id
/// order), then `null_count` copies of the null card. Without a null card
/// the nulls are skipped.
#[must_use]
pub fn build_deck_array(config: &DeckConfiguration, null_id: Option<&CardId>) -> Vec<CardId> {
    let mut out = Vec::with_capacity(config.deck_size() as usize);
    for (id, &qty) in config.base_counts.iter().chain(&config.mod_counts) {
        out.extend(std::iter::repeat(id).take(qty as usize).cloned());
    }
    if let Some(null_id) = null_id {
        out.extend(std::iter::repeat(null_id).take(config.null_count as usize).cloned());
    }
    out
}

/// Build a deck array and shuffle it.
#[must_use]
pub fn build_shuffled(
    config: &DeckConfiguration,
    null_id: Option<&CardId>,
    rng: &mut DeckRng,
) -> Vec<CardId> {
    let mut deck = build_deck_array(config, null_id);
    rng.shuffle(&mut deck);
    deck
}

impl ZoneState {
    /// Draw the top library card into hand as `Unspent`.
    ///
    /// - Refuses at the hand limit.
    /// - With library, hand and discard all empty, the library is
    ///   materialized via `materialize` and shuffled.
    /// - With only the library empty, the discard is shuffled and pushed
    ///   onto the library, and the discard is cleared.
    /// - If the library is still empty, refuses with `NothingToDraw`.
    pub fn draw<F>(&mut self, hand_limit: usize, rng: &mut DeckRng, materialize: F) -> Outcome
    where
        F: FnOnce() -> Vec<CardId>,
    {
        if self.hand.len() >= hand_limit {
            return Outcome::capacity(Limit::HandLimit);
        }

        if self.is_empty() {
            self.library = materialize();
            rng.shuffle(&mut self.library);
            log::debug!("Materialized {} cards on draw", self.library.len());
        } else if self.library.is_empty() && !self.discard.is_empty() {
            let mut ids: Vec<CardId> = self.discard.drain(..).map(|d| d.id).collect();
            rng.shuffle(&mut ids);
            log::debug!("Reshuffled {} discarded cards into the library", ids.len());
            self.library.extend(ids);
        }

        match self.library.pop() {
            Some(id) => {
                self.hand.push(HandEntry::unspent(id));
                Outcome::Applied
            }
            None => Outcome::precondition(Precondition::NothingToDraw),
        }
    }

    /// Move the whole discard back into the library.
    ///
    /// With `shuffle`, the discard ids are shuffled on their own and the
    /// merged library is shuffled again. `to_top` appends at the top (end)
    /// instead of the bottom (start); it only matters without `shuffle`.
    pub fn return_discard_to_library(&mut self, shuffle: bool, to_top: bool, rng: &mut DeckRng) -> Outcome {
        if self.discard.is_empty() {
            return Outcome::precondition(Precondition::NothingToMove);
        }

        let mut ids: Vec<CardId> = self.discard.drain(..).map(|d| d.id).collect();
        if shuffle {
            rng.shuffle(&mut ids);
        }
        if to_top {
            self.library.extend(ids);
        } else {
            ids.append(&mut self.library);
            self.library = ids;
        }
        if shuffle {
            rng.shuffle(&mut self.library);
        }
        Outcome::Applied
    }

    /// Move cards with `card_id` from hand to discard tagged `origin`.
    ///
    /// Moves the first match, or every match when `all` (scanned from the
    /// end so removal indices stay valid).
    pub fn discard_from_hand(&mut self, card_id: &str, all: bool, origin: DiscardOrigin) -> Outcome {
        let mut removed = Vec::new();
        if all {
            for i in (0..self.hand.len()).rev() {
                if self.hand[i].id.as_str() == card_id {
                    removed.push(self.hand.remove(i));
                }
            }
        } else if let Some(idx) = self.hand.iter().position(|h| h.id.as_str() == card_id) {
            removed.push(self.hand.remove(idx));
        }

        if removed.is_empty() {
            return Outcome::precondition(Precondition::NothingToMove);
        }
        self.discard
            .extend(removed.into_iter().map(|h| DiscardEntry::new(h.id, origin)));
        Outcome::Applied
    }

    /// Move discard entries with `card_id` back to hand as `Unspent`.
    ///
    /// Moves one, or as many as fit when `all`, preferring the most
    /// recently discarded copies. Refuses when the hand has no space.
    pub fn return_discard_group_to_hand(&mut self, card_id: &str, all: bool, hand_limit: usize) -> Outcome {
        let space = self.hand_space(hand_limit);
        if space == 0 {
            return Outcome::capacity(Limit::HandLimit);
        }

        let mut moved = Vec::new();
        for i in (0..self.discard.len()).rev() {
            if moved.len() >= space {
                break;
            }
            if self.discard[i].id.as_str() == card_id {
                moved.push(self.discard.remove(i));
                if !all {
                    break;
                }
            }
        }

        if moved.is_empty() {
            return Outcome::precondition(Precondition::NothingToMove);
        }
        self.hand.extend(moved.into_iter().map(|d| HandEntry::unspent(d.id)));
        Outcome::Applied
    }

    /// Move the discard entry at `index` back to hand as `Unspent`.
    pub fn return_discard_item_to_hand(&mut self, index: usize, hand_limit: usize) -> Outcome {
        if self.hand.len() >= hand_limit {
            return Outcome::capacity(Limit::HandLimit);
        }
        if index >= self.discard.len() {
            return Outcome::precondition(Precondition::NothingToMove);
        }
        let entry = self.discard.remove(index);
        self.hand.push(HandEntry::unspent(entry.id));
        Outcome::Applied
    }

    /// Move the discard entry at `index` onto the library top.
    pub fn return_discard_item_to_library(&mut self, index: usize) -> Outcome {
        if index >= self.discard.len() {
            return Outcome::precondition(Precondition::NothingToMove);
        }
        let entry = self.discard.remove(index);
        self.library.push(entry.id);
        Outcome::Applied
    }

    /// Move discard entries with `card_id` onto the library top.
    ///
    /// Moves the first match, or every match (in discard order) when `all`.
    pub fn return_discard_group_to_library(&mut self, card_id: &str, all: bool) -> Outcome {
        if all {
            let (moved, remaining): (Vec<_>, Vec<_>) = self
                .discard
                .drain(..)
                .partition(|d| d.id.as_str() == card_id);
            self.discard = remaining;
            if moved.is_empty() {
                return Outcome::precondition(Precondition::NothingToMove);
            }
            self.library.extend(moved.into_iter().map(|d| d.id));
            return Outcome::Applied;
        }

        match self.discard.iter().position(|d| d.id.as_str() == card_id) {
            Some(idx) => {
                let entry = self.discard.remove(idx);
                self.library.push(entry.id);
                Outcome::Applied
            }
            None => Outcome::precondition(Precondition::NothingToMove),
        }
    }

    /// Mill up to `count` cards from the library top into discard.
    pub fn discard_from_library(&mut self, count: usize) -> Outcome {
        if self.library.is_empty() || count == 0 {
            return Outcome::precondition(Precondition::NothingToMove);
        }
        for _ in 0..count {
            let Some(id) = self.library.pop() else { break };
            self.discard.push(DiscardEntry::new(id, DiscardOrigin::Discarded));
        }
        Outcome::Applied
    }

    /// Hard reset: the library becomes a shuffled copy of `deck`; hand and
    /// discard are cleared unconditionally.
    pub fn reset(&mut self, deck: Vec<CardId>, rng: &mut DeckRng) {
        self.clear();
        self.library = deck;
        rng.shuffle(&mut self.library);
    }
}
