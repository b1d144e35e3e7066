//! Deck configuration: the recipe a physical deck is materialized from.
//!
//! A configuration holds base and modifier counts plus two scalar
//! budgets (null count, modifier capacity). Adjustments clamp at zero
//! and refuse changes that would break the base target or the modifier
//! capacity. Lock handling lives in [`DeckBuilder`](crate::builder::DeckBuilder).

use serde::{Deserialize, Serialize};

use super::counts::{can_add_mod, initial_counts, mod_usage, total_of, CountMap};
use crate::cards::{CardCatalog, CardId};
use crate::core::config::DeckRules;
use crate::core::outcome::{Limit, Outcome, Precondition};

/// Counts and budgets for a deck.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckConfiguration {
    pub base_counts: CountMap,
    pub mod_counts: CountMap,
    pub null_count: u32,
    pub modifier_capacity: u32,
}

/// Result of the three independent validity checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Validation {
    /// Base total equals the target (always true in simple mode).
    pub base_valid: bool,
    /// Null count is at least the minimum.
    pub null_valid: bool,
    /// Modifier usage fits the capacity (always true when waived).
    pub mod_valid: bool,
    /// Current base total.
    pub base_total: u32,
    /// Current modifier usage under the capacity mode.
    pub mod_used: u32,
}

impl Validation {
    /// Overall deck validity.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.base_valid && self.null_valid && self.mod_valid
    }
}

impl DeckConfiguration {
    /// Fresh configuration: every catalog card at zero, minimum nulls,
    /// default modifier capacity, then simple-mode initial counts.
    #[must_use]
    pub fn new(catalog: &CardCatalog, rules: &DeckRules) -> Self {
        let mut config = Self {
            base_counts: initial_counts(catalog.base_cards()),
            mod_counts: initial_counts(catalog.mod_cards()),
            null_count: rules.min_nulls,
            modifier_capacity: rules.default_modifier_capacity,
        };
        config.apply_initial_counts(catalog, rules);
        config
    }

    /// Simple counter mode seeds the first base and first modifier card
    /// when their pool totals are zero. No-op in standard mode.
    pub fn apply_initial_counts(&mut self, catalog: &CardCatalog, rules: &DeckRules) {
        if !rules.is_simple() {
            return;
        }
        if let Some(first) = catalog.base_cards().first() {
            if total_of(&self.base_counts) == 0 {
                let qty = rules.base_initial_count.unwrap_or(rules.base_target);
                self.base_counts.insert(first.id.clone(), qty);
            }
        }
        if let Some(first) = catalog.mod_cards().first() {
            if total_of(&self.mod_counts) == 0 {
                let qty = rules.mod_initial_count.unwrap_or(rules.default_modifier_capacity);
                self.mod_counts.insert(first.id.clone(), qty);
            }
        }
    }

    /// Merge restored counts over catalog zeros, dropping unknown ids and
    /// clamping the null count at the minimum.
    #[must_use]
    pub fn restore(
        catalog: &CardCatalog,
        rules: &DeckRules,
        base_counts: &CountMap,
        mod_counts: &CountMap,
        null_count: Option<u32>,
        modifier_capacity: Option<u32>,
    ) -> Self {
        let mut base = initial_counts(catalog.base_cards());
        base.extend(
            base_counts
                .iter()
                .filter(|(id, _)| catalog.is_base(id.as_str()))
                .map(|(id, &n)| (id.clone(), n)),
        );
        let mut mods = initial_counts(catalog.mod_cards());
        mods.extend(
            mod_counts
                .iter()
                .filter(|(id, _)| catalog.is_mod(id.as_str()))
                .map(|(id, &n)| (id.clone(), n)),
        );

        Self {
            base_counts: base,
            mod_counts: mods,
            null_count: null_count.unwrap_or(rules.min_nulls).max(rules.min_nulls),
            modifier_capacity: modifier_capacity.unwrap_or(rules.default_modifier_capacity),
        }
    }

    /// Base-card total.
    #[must_use]
    pub fn base_total(&self) -> u32 {
        total_of(&self.base_counts)
    }

    /// Modifier usage under the configured capacity mode.
    #[must_use]
    pub fn mod_used(&self, catalog: &CardCatalog, rules: &DeckRules) -> u32 {
        mod_usage(rules.capacity_mode, catalog.mod_cards(), &self.mod_counts)
    }

    /// Total number of physical cards this configuration materializes.
    #[must_use]
    pub fn deck_size(&self) -> u32 {
        self.base_total()
            .saturating_add(total_of(&self.mod_counts))
            .saturating_add(self.null_count)
    }

    /// Run the three validity checks.
    #[must_use]
    pub fn validate(&self, catalog: &CardCatalog, rules: &DeckRules) -> Validation {
        let base_total = self.base_total();
        let mod_used = self.mod_used(catalog, rules);
        Validation {
            base_valid: rules.is_simple() || base_total == rules.base_target,
            null_valid: self.null_count >= rules.min_nulls,
            mod_valid: rules.waives_capacity() || mod_used <= self.modifier_capacity,
            base_total,
            mod_used,
        }
    }

    /// Adjust a base card count by a signed delta, clamped at 0.
    ///
    /// Refuses unknown ids and, outside simple mode, increments that push
    /// the total above the base target.
    pub fn adjust_base(
        &mut self,
        catalog: &CardCatalog,
        rules: &DeckRules,
        card_id: &str,
        delta: i64,
    ) -> Outcome {
        if !catalog.is_base(card_id) {
            return Outcome::precondition(Precondition::UnknownCard);
        }
        let current = self.base_counts.get(card_id).copied().unwrap_or(0);
        let next = clamp_add(current, delta);
        let new_total = (self.base_total() - current).saturating_add(next);
        if delta > 0 && !rules.is_simple() && new_total > rules.base_target {
            return Outcome::capacity(Limit::BaseTarget);
        }
        self.base_counts.insert(CardId::new(card_id), next);
        Outcome::Applied
    }

    /// Adjust a modifier card count by a signed delta, clamped at 0.
    ///
    /// Increments refuse if the hypothetical addition would exceed the
    /// modifier capacity.
    pub fn adjust_mod(
        &mut self,
        catalog: &CardCatalog,
        rules: &DeckRules,
        card_id: &str,
        delta: i64,
    ) -> Outcome {
        if !catalog.is_mod(card_id) {
            return Outcome::precondition(Precondition::UnknownCard);
        }
        if delta > 0 {
            let quantity = u32::try_from(delta).unwrap_or(u32::MAX);
            if !can_add_mod(
                rules,
                catalog.mod_cards(),
                &self.mod_counts,
                self.modifier_capacity,
                card_id,
                quantity,
            ) {
                return Outcome::capacity(Limit::ModifierCapacity);
            }
        }
        let current = self.mod_counts.get(card_id).copied().unwrap_or(0);
        self.mod_counts.insert(CardId::new(card_id), clamp_add(current, delta));
        Outcome::Applied
    }

    /// Adjust the null count, clamped at the rules' minimum.
    pub fn adjust_null(&mut self, rules: &DeckRules, delta: i64) -> Outcome {
        self.null_count = clamp_add(self.null_count, delta).max(rules.min_nulls);
        Outcome::Applied
    }

    /// Adjust the modifier capacity, clamped at 0.
    pub fn adjust_capacity(&mut self, delta: i64) -> Outcome {
        self.modifier_capacity = clamp_add(self.modifier_capacity, delta);
        Outcome::Applied
    }
}

fn clamp_add(value: u32, delta: i64) -> u32 {
    let next = i64::from(value).saturating_add(delta).max(0);
    u32::try_from(next).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::core::outcome::Refusal;

    fn catalog() -> CardCatalog {
        CardCatalog::new()
            .with_base(Card::new("b1", "Base 1"))
            .with_base(Card::new("b2", "Base 2"))
            .with_mod(Card::new("m1", "Mod 1").with_cost(2))
            .with_mod(Card::new("m2", "Mod 2").with_cost(3))
            .with_null(Card::new("null", "Null"))
    }

    fn rules() -> DeckRules {
        DeckRules::new().with_base_target(3).with_min_nulls(2).with_modifier_capacity(5)
    }

    #[test]
    fn test_new_configuration() {
        let config = DeckConfiguration::new(&catalog(), &rules());
        assert_eq!(config.base_counts.len(), 2);
        assert_eq!(config.base_total(), 0);
        assert_eq!(config.null_count, 2);
        assert_eq!(config.modifier_capacity, 5);
    }

    #[test]
    fn test_simple_mode_initial_counts() {
        let rules = rules().simple_counters().with_initial_counts(None, Some(4));
        let config = DeckConfiguration::new(&catalog(), &rules);
        assert_eq!(config.base_counts.get("b1"), Some(&3));
        assert_eq!(config.mod_counts.get("m1"), Some(&4));
        assert_eq!(config.base_counts.get("b2"), Some(&0));
    }

    #[test]
    fn test_base_target_refusal() {
        let (cat, rules) = (catalog(), rules());
        let mut config = DeckConfiguration::new(&cat, &rules);

        assert!(config.adjust_base(&cat, &rules, "b1", 2).is_applied());
        assert!(config.adjust_base(&cat, &rules, "b2", 1).is_applied());
        let refused = config.adjust_base(&cat, &rules, "b2", 1);
        assert_eq!(refused.refusal(), Some(Refusal::Capacity(Limit::BaseTarget)));
        assert_eq!(config.base_total(), 3);
    }

    #[test]
    fn test_simple_mode_ignores_base_target() {
        let (cat, rules) = (catalog(), rules().simple_counters());
        let mut config = DeckConfiguration::new(&cat, &rules);
        assert!(config.adjust_base(&cat, &rules, "b2", 10).is_applied());
        assert!(config.validate(&cat, &rules).base_valid);
    }

    #[test]
    fn test_clamp_at_zero() {
        let (cat, rules) = (catalog(), rules());
        let mut config = DeckConfiguration::new(&cat, &rules);
        config.adjust_base(&cat, &rules, "b1", 1);
        assert!(config.adjust_base(&cat, &rules, "b1", -5).is_applied());
        assert_eq!(config.base_counts.get("b1"), Some(&0));
    }

    #[test]
    fn test_unknown_ids_are_inert() {
        let (cat, rules) = (catalog(), rules());
        let mut config = DeckConfiguration::new(&cat, &rules);
        let before = config.clone();

        let out = config.adjust_base(&cat, &rules, "nope", 1);
        assert_eq!(out.refusal(), Some(Refusal::Precondition(Precondition::UnknownCard)));
        // A modifier id is not a base id
        assert!(!config.adjust_base(&cat, &rules, "m1", 1).is_applied());
        assert!(!config.adjust_mod(&cat, &rules, "b1", 1).is_applied());
        assert_eq!(config, before);
    }

    #[test]
    fn test_mod_capacity_refusal() {
        let (cat, rules) = (catalog(), rules());
        let mut config = DeckConfiguration::new(&cat, &rules);

        assert!(config.adjust_mod(&cat, &rules, "m1", 1).is_applied()); // 2
        assert!(config.adjust_mod(&cat, &rules, "m2", 1).is_applied()); // 5
        let refused = config.adjust_mod(&cat, &rules, "m1", 1);
        assert_eq!(refused.refusal(), Some(Refusal::Capacity(Limit::ModifierCapacity)));
        // Decrements are never refused
        assert!(config.adjust_mod(&cat, &rules, "m2", -1).is_applied());
        assert_eq!(config.mod_used(&cat, &rules), 2);
    }

    #[test]
    fn test_null_and_capacity_clamps() {
        let rules = rules();
        let mut config = DeckConfiguration::new(&catalog(), &rules);

        config.adjust_null(&rules, -3);
        assert_eq!(config.null_count, 2);
        config.adjust_null(&rules, 4);
        assert_eq!(config.null_count, 6);

        config.adjust_capacity(-100);
        assert_eq!(config.modifier_capacity, 0);
    }

    #[test]
    fn test_validate() {
        let (cat, rules) = (catalog(), rules());
        let mut config = DeckConfiguration::new(&cat, &rules);

        let v = config.validate(&cat, &rules);
        assert!(!v.base_valid);
        assert!(v.null_valid);
        assert!(v.mod_valid);
        assert!(!v.is_valid());

        config.adjust_base(&cat, &rules, "b1", 3);
        assert!(config.validate(&cat, &rules).is_valid());

        // Lowering capacity below usage invalidates the modifier check
        config.adjust_mod(&cat, &rules, "m2", 1);
        config.adjust_capacity(-4);
        let v = config.validate(&cat, &rules);
        assert!(!v.mod_valid);
        assert_eq!(v.mod_used, 3);
    }

    #[test]
    fn test_restore_drops_unknown_ids() {
        let (cat, rules) = (catalog(), rules());
        let base: CountMap = [(CardId::new("b1"), 2), (CardId::new("ghost"), 9)].into_iter().collect();
        let mods: CountMap = [(CardId::new("m2"), 1), (CardId::new("b1"), 4)].into_iter().collect();

        let config = DeckConfiguration::restore(&cat, &rules, &base, &mods, Some(0), None);
        assert_eq!(config.base_counts.get("b1"), Some(&2));
        assert!(!config.base_counts.contains_key("ghost"));
        assert_eq!(config.base_counts.get("b2"), Some(&0));
        assert!(!config.mod_counts.contains_key("b1"));
        assert_eq!(config.null_count, 2);
        assert_eq!(config.modifier_capacity, 5);
    }

    #[test]
    fn test_deck_size() {
        let (cat, rules) = (catalog(), rules());
        let mut config = DeckConfiguration::new(&cat, &rules);
        config.adjust_base(&cat, &rules, "b1", 3);
        config.adjust_mod(&cat, &rules, "m1", 2);
        assert_eq!(config.deck_size(), 3 + 2 + 2);
    }

    #[test]
    fn test_huge_counts_saturate() {
        let (cat, rules) = (catalog(), rules());
        let base: CountMap = [(CardId::new("b1"), u32::MAX), (CardId::new("b2"), 1)].into_iter().collect();
        let mods: CountMap = [(CardId::new("m2"), 2_000_000_000)].into_iter().collect();
        let mut config = DeckConfiguration::restore(&cat, &rules, &base, &mods, None, None);

        let v = config.validate(&cat, &rules);
        assert_eq!(v.base_total, u32::MAX);
        assert_eq!(v.mod_used, u32::MAX);
        assert!(!v.base_valid);
        assert!(!v.mod_valid);
        assert_eq!(config.deck_size(), u32::MAX);

        // Lowering a count is still allowed from a saturated total
        assert!(config.adjust_base(&cat, &rules, "b2", -1).is_applied());
        assert_eq!(config.base_total(), u32::MAX);
    }
}
