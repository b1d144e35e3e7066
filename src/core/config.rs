//! Deck rules configuration.
//!
//! Callers configure the engine at startup by providing `DeckRules`:
//! - Base target and minimum null count (deck validity)
//! - Default modifier capacity and hand limit (fresh state defaults)
//! - `CounterMode` and `CapacityMode` (how checks are applied)
//!
//! The engine never hardcodes these values - the defaults below mirror
//! the standard Collapse ruleset.

use serde::{Deserialize, Serialize};

/// Default number of base cards a standard deck must contain.
pub const DEFAULT_BASE_TARGET: u32 = 26;

/// Default minimum number of null cards.
pub const DEFAULT_MIN_NULLS: u32 = 5;

/// Default modifier capacity for a fresh deck.
pub const DEFAULT_MODIFIER_CAPACITY: u32 = 10;

/// Default (and maximum) hand limit.
pub const DEFAULT_HAND_LIMIT: usize = 5;

/// How base-card counters are enforced.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounterMode {
    /// Base total must equal the base target; increments stop at the target.
    #[default]
    Standard,
    /// GM-style free counters: the base target check is waived.
    Simple,
}

/// How modifier capacity usage is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CapacityMode {
    /// Usage is the sum of `quantity * cost` over modifier cards.
    #[default]
    CostWeighted,
    /// Usage is the raw number of modifier cards.
    RawCount,
}

/// Complete rules configuration for a deck builder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckRules {
    /// Required base-card total (standard counter mode).
    pub base_target: u32,

    /// Minimum null cards; the null count is clamped at this floor.
    pub min_nulls: u32,

    /// Modifier capacity of a fresh configuration.
    pub default_modifier_capacity: u32,

    /// Hand limit of a fresh state and the fallback for missing snapshots.
    pub default_hand_limit: usize,

    /// Upper bound accepted by `DeckBuilder::set_hand_limit`.
    pub max_hand_limit: usize,

    /// Base counter enforcement.
    pub counter_mode: CounterMode,

    /// Modifier capacity measurement.
    pub capacity_mode: CapacityMode,

    /// Simple mode: initial count for the first base card when the base
    /// total is zero. `None` uses `base_target`.
    pub base_initial_count: Option<u32>,

    /// Simple mode: initial count for the first modifier card when the
    /// modifier total is zero. `None` uses `default_modifier_capacity`.
    pub mod_initial_count: Option<u32>,
}

impl Default for DeckRules {
    fn default() -> Self {
        Self {
            base_target: DEFAULT_BASE_TARGET,
            min_nulls: DEFAULT_MIN_NULLS,
            default_modifier_capacity: DEFAULT_MODIFIER_CAPACITY,
            default_hand_limit: DEFAULT_HAND_LIMIT,
            max_hand_limit: DEFAULT_HAND_LIMIT,
            counter_mode: CounterMode::Standard,
            capacity_mode: CapacityMode::CostWeighted,
            base_initial_count: None,
            mod_initial_count: None,
        }
    }
}

impl DeckRules {
    /// Create the standard ruleset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the required base total.
    #[must_use]
    pub fn with_base_target(mut self, target: u32) -> Self {
        self.base_target = target;
        self
    }

    /// Set the minimum null count.
    #[must_use]
    pub fn with_min_nulls(mut self, min: u32) -> Self {
        self.min_nulls = min;
        self
    }

    /// Set the default modifier capacity.
    #[must_use]
    pub fn with_modifier_capacity(mut self, capacity: u32) -> Self {
        self.default_modifier_capacity = capacity;
        self
    }

    /// Set the default hand limit. Raises the maximum if needed.
    #[must_use]
    pub fn with_hand_limit(mut self, limit: usize) -> Self {
        self.default_hand_limit = limit;
        self.max_hand_limit = self.max_hand_limit.max(limit);
        self
    }

    /// Set the maximum hand limit accepted from callers.
    #[must_use]
    pub fn with_max_hand_limit(mut self, max: usize) -> Self {
        self.max_hand_limit = max;
        self
    }

    /// Switch to GM-style simple counters.
    #[must_use]
    pub fn simple_counters(mut self) -> Self {
        self.counter_mode = CounterMode::Simple;
        self
    }

    /// Measure modifier capacity as a raw card count.
    #[must_use]
    pub fn capacity_as_count(mut self) -> Self {
        self.capacity_mode = CapacityMode::RawCount;
        self
    }

    /// Set simple-mode initial counts.
    #[must_use]
    pub fn with_initial_counts(mut self, base: Option<u32>, modifier: Option<u32>) -> Self {
        self.base_initial_count = base;
        self.mod_initial_count = modifier;
        self
    }

    /// Is the base target check waived?
    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.counter_mode == CounterMode::Simple
    }

    /// Are modifier capacity checks waived entirely?
    ///
    /// Only in simple counter mode combined with raw-count capacity.
    #[must_use]
    pub fn waives_capacity(&self) -> bool {
        self.is_simple() && self.capacity_mode == CapacityMode::RawCount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rules = DeckRules::default();
        assert_eq!(rules.base_target, 26);
        assert_eq!(rules.min_nulls, 5);
        assert_eq!(rules.default_modifier_capacity, 10);
        assert_eq!(rules.default_hand_limit, 5);
        assert_eq!(rules.counter_mode, CounterMode::Standard);
        assert_eq!(rules.capacity_mode, CapacityMode::CostWeighted);
        assert!(!rules.is_simple());
        assert!(!rules.waives_capacity());
    }

    #[test]
    fn test_builder() {
        let rules = DeckRules::new()
            .with_base_target(3)
            .with_min_nulls(2)
            .with_modifier_capacity(4)
            .with_hand_limit(7);

        assert_eq!(rules.base_target, 3);
        assert_eq!(rules.min_nulls, 2);
        assert_eq!(rules.default_modifier_capacity, 4);
        assert_eq!(rules.default_hand_limit, 7);
        assert_eq!(rules.max_hand_limit, 7);
    }

    #[test]
    fn test_capacity_waiver_requires_both_modes() {
        assert!(!DeckRules::new().capacity_as_count().waives_capacity());
        assert!(!DeckRules::new().simple_counters().waives_capacity());
        assert!(DeckRules::new().simple_counters().capacity_as_count().waives_capacity());
    }

    #[test]
    fn test_serde() {
        let rules = DeckRules::new().simple_counters().with_initial_counts(Some(12), None);
        let json = serde_json::to_string(&rules).unwrap();
        let back: DeckRules = serde_json::from_str(&json).unwrap();
        assert_eq!(rules, back);
    }
}
