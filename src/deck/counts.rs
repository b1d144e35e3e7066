//! Count maps and capacity arithmetic.
//!
//! A `CountMap` maps card id to quantity. Iteration order is the id
//! order, which keeps deck materialization deterministic.

use std::collections::BTreeMap;

use crate::cards::{Card, CardId};
use crate::core::config::{CapacityMode, DeckRules};

/// Card id to quantity.
pub type CountMap = BTreeMap<CardId, u32>;

/// Zero-initialized counts for every card of a pool.
#[must_use]
pub fn initial_counts(cards: &[Card]) -> CountMap {
    cards.iter().map(|c| (c.id.clone(), 0)).collect()
}

/// Sum of all quantities.
#[must_use]
pub fn total_of(counts: &CountMap) -> u32 {
    counts.values().fold(0, |acc, &n| acc.saturating_add(n))
}

/// Cost-weighted usage: `sum(quantity * cost)` over modifier cards.
///
/// Absent costs count as 0. Counts for ids outside `mod_cards` are ignored.
/// Saturates at `u32::MAX`.
#[must_use]
pub fn capacity_used(mod_cards: &[Card], mod_counts: &CountMap) -> u32 {
    mod_cards
        .iter()
        .map(|card| {
            let quantity = mod_counts.get(&card.id).copied().unwrap_or(0);
            quantity.saturating_mul(card.cost_or_zero())
        })
        .fold(0, u32::saturating_add)
}

/// Modifier usage under the configured capacity mode.
#[must_use]
pub fn mod_usage(mode: CapacityMode, mod_cards: &[Card], mod_counts: &CountMap) -> u32 {
    match mode {
        CapacityMode::CostWeighted => capacity_used(mod_cards, mod_counts),
        CapacityMode::RawCount => total_of(mod_counts),
    }
}

/// Can `quantity` more copies of `card_id` be added without exceeding
/// `capacity`?
///
/// Pure predicate over a snapshot of counts, so batched adjustments can
/// be validated before anything is committed.
#[must_use]
pub fn can_add_mod(
    rules: &DeckRules,
    mod_cards: &[Card],
    mod_counts: &CountMap,
    capacity: u32,
    card_id: &str,
    quantity: u32,
) -> bool {
    if rules.waives_capacity() {
        return true;
    }
    let used = mod_usage(rules.capacity_mode, mod_cards, mod_counts);
    let added = match rules.capacity_mode {
        CapacityMode::RawCount => quantity,
        CapacityMode::CostWeighted => {
            let cost = mod_cards
                .iter()
                .find(|c| c.id.as_str() == card_id)
                .map_or(0, Card::cost_or_zero);
            cost.saturating_mul(quantity)
        }
    };
    used.saturating_add(added) <= capacity
}
