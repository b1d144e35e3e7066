//! Deck builder state container.
//!
//! `DeckBuilder` owns everything a session mutates: the configuration,
//! the zones, the lock and build/shuffle flags, the hand limit, the
//! active play and the saved decks. Every operation returns an
//! [`Outcome`]; refusals leave the builder unchanged.
//!
//! Two layers of checks exist on purpose:
//! - engine operations (`draw`, zone moves) only enforce what the zones
//!   themselves need;
//! - guarded operations (`handle_draw`, `start_play_base`,
//!   `attach_modifier`) add the checks a user-facing caller needs and
//!   return a refusal whose `Display` is the user message.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::saved::SavedDeck;
use crate::cards::{CardCatalog, CardId};
use crate::core::config::DeckRules;
use crate::core::outcome::{Outcome, Precondition};
use crate::core::rng::DeckRng;
use crate::deck::{DeckConfiguration, Validation};
use crate::play::{self, PlayState};
use crate::zones::{build_deck_array, DiscardOrigin, ZoneState};

/// Complete deck builder state.
///
/// ## Example
///
/// ```
/// use std::sync::Arc;
/// use engram_deck::builder::DeckBuilder;
/// use engram_deck::cards::{Card, CardCatalog};
/// use engram_deck::core::{DeckRng, DeckRules};
///
/// let catalog = CardCatalog::new()
///     .with_base(Card::new("b1", "Strike"))
///     .with_null(Card::new("null", "Static"));
/// let rules = DeckRules::new().with_base_target(3).with_min_nulls(2);
///
/// let mut builder = DeckBuilder::new(Arc::new(catalog), rules, DeckRng::new(7));
/// builder.adjust_base_count("b1", 3);
/// assert!(builder.validation().is_valid());
///
/// builder.lock();
/// builder.build_deck();
/// builder.shuffle_deck();
/// assert!(builder.handle_draw().is_applied());
/// assert_eq!(builder.zones().hand.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct DeckBuilder {
    catalog: Arc<CardCatalog>,
    rules: DeckRules,
    config: DeckConfiguration,
    zones: ZoneState,
    play: PlayState,
    is_locked: bool,
    has_built_deck: bool,
    has_shuffled_deck: bool,
    hand_limit: usize,
    deck_name: String,
    saved_decks: BTreeMap<String, SavedDeck>,
    rng: DeckRng,
}

/// Raw parts of a builder, used when restoring persisted state.
#[derive(Clone, Debug)]
pub(crate) struct BuilderParts {
    pub config: DeckConfiguration,
    pub zones: ZoneState,
    pub is_locked: bool,
    pub has_built_deck: bool,
    pub has_shuffled_deck: bool,
    pub hand_limit: usize,
    pub deck_name: String,
    pub saved_decks: BTreeMap<String, SavedDeck>,
}

impl DeckBuilder {
    /// Create a builder with a fresh default configuration.
    #[must_use]
    pub fn new(catalog: Arc<CardCatalog>, rules: DeckRules, rng: DeckRng) -> Self {
        let config = DeckConfiguration::new(&catalog, &rules);
        let hand_limit = rules.default_hand_limit;
        Self {
            catalog,
            rules,
            config,
            zones: ZoneState::new(),
            play: PlayState::Idle,
            is_locked: false,
            has_built_deck: false,
            has_shuffled_deck: false,
            hand_limit,
            deck_name: String::new(),
            saved_decks: BTreeMap::new(),
            rng,
        }
    }

    pub(crate) fn from_parts(
        catalog: Arc<CardCatalog>,
        rules: DeckRules,
        rng: DeckRng,
        parts: BuilderParts,
    ) -> Self {
        let mut builder = Self::new(catalog, rules, rng);
        builder.config = parts.config;
        builder.config.apply_initial_counts(&builder.catalog, &builder.rules);
        builder.zones = parts.zones;
        builder.is_locked = parts.is_locked;
        builder.has_built_deck = parts.has_built_deck;
        builder.has_shuffled_deck = parts.has_shuffled_deck;
        builder.hand_limit = parts.hand_limit;
        builder.deck_name = parts.deck_name;
        builder.saved_decks = parts.saved_decks;
        builder
    }

    // === Accessors ===

    #[must_use]
    pub fn catalog(&self) -> &CardCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn rules(&self) -> &DeckRules {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &DeckConfiguration {
        &self.config
    }

    #[must_use]
    pub fn zones(&self) -> &ZoneState {
        &self.zones
    }

    #[must_use]
    pub fn play(&self) -> &PlayState {
        &self.play
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    #[must_use]
    pub fn has_built_deck(&self) -> bool {
        self.has_built_deck
    }

    #[must_use]
    pub fn has_shuffled_deck(&self) -> bool {
        self.has_shuffled_deck
    }

    #[must_use]
    pub fn hand_limit(&self) -> usize {
        self.hand_limit
    }

    #[must_use]
    pub fn deck_name(&self) -> &str {
        &self.deck_name
    }

    #[must_use]
    pub fn saved_decks(&self) -> &BTreeMap<String, SavedDeck> {
        &self.saved_decks
    }

    /// The three validity checks for the current configuration.
    #[must_use]
    pub fn validation(&self) -> Validation {
        self.config.validate(&self.catalog, &self.rules)
    }

    /// The configuration materialized in canonical order.
    #[must_use]
    pub fn deck_array(&self) -> Vec<CardId> {
        build_deck_array(&self.config, self.catalog.null_id())
    }

    /// First unmet draw precondition, if any.
    #[must_use]
    pub fn draw_blocker(&self) -> Option<Precondition> {
        if !self.is_locked {
            Some(Precondition::DrawRequiresLock)
        } else if !self.has_built_deck {
            Some(Precondition::DeckNotBuilt)
        } else if !self.has_shuffled_deck {
            Some(Precondition::DeckNotShuffled)
        } else {
            None
        }
    }

    // === Configuration (unlocked only) ===

    fn ensure_unlocked(&self) -> Option<Outcome> {
        self.is_locked
            .then(|| Outcome::precondition(Precondition::DeckLocked))
    }

    /// Adjust a base card count. Refused while locked.
    pub fn adjust_base_count(&mut self, card_id: &str, delta: i64) -> Outcome {
        if let Some(refused) = self.ensure_unlocked() {
            return refused;
        }
        self.config.adjust_base(&self.catalog, &self.rules, card_id, delta)
    }

    /// Adjust a modifier card count. Refused while locked.
    pub fn adjust_mod_count(&mut self, card_id: &str, delta: i64) -> Outcome {
        if let Some(refused) = self.ensure_unlocked() {
            return refused;
        }
        self.config.adjust_mod(&self.catalog, &self.rules, card_id, delta)
    }

    /// Adjust the first catalog base card (simple counter UI).
    pub fn adjust_primary_base_count(&mut self, delta: i64) -> Outcome {
        match self.catalog.base_cards().first() {
            Some(card) => {
                let id = card.id.clone();
                self.adjust_base_count(id.as_str(), delta)
            }
            None => Outcome::precondition(Precondition::UnknownCard),
        }
    }

    /// Adjust the first catalog modifier card (simple counter UI).
    pub fn adjust_primary_mod_count(&mut self, delta: i64) -> Outcome {
        match self.catalog.mod_cards().first() {
            Some(card) => {
                let id = card.id.clone();
                self.adjust_mod_count(id.as_str(), delta)
            }
            None => Outcome::precondition(Precondition::UnknownCard),
        }
    }

    /// Adjust the null count. Refused while locked.
    pub fn adjust_null_count(&mut self, delta: i64) -> Outcome {
        if let Some(refused) = self.ensure_unlocked() {
            return refused;
        }
        self.config.adjust_null(&self.rules, delta)
    }

    /// Adjust the modifier capacity. Refused while locked.
    pub fn adjust_modifier_capacity(&mut self, delta: i64) -> Outcome {
        if let Some(refused) = self.ensure_unlocked() {
            return refused;
        }
        self.config.adjust_capacity(delta)
    }

    /// Set the hand limit, clamped to `[0, max_hand_limit]`.
    pub fn set_hand_limit(&mut self, limit: usize) -> Outcome {
        self.hand_limit = limit.min(self.rules.max_hand_limit);
        Outcome::Applied
    }

    // === Lock ===

    fn clear_zones(&mut self) {
        self.zones.clear();
        self.play = PlayState::Idle;
        self.has_built_deck = false;
        self.has_shuffled_deck = false;
    }

    /// Freeze the configuration. Zones start empty; build then shuffle
    /// before drawing.
    pub fn lock(&mut self) -> Outcome {
        if self.is_locked {
            return Outcome::precondition(Precondition::DeckLocked);
        }
        self.clear_zones();
        self.is_locked = true;
        log::debug!("Deck locked ({} cards configured)", self.config.deck_size());
        Outcome::Applied
    }

    /// Return to configuration-edit mode. Zones are cleared.
    pub fn unlock(&mut self) -> Outcome {
        if !self.is_locked {
            return Outcome::precondition(Precondition::DeckUnlocked);
        }
        self.clear_zones();
        self.is_locked = false;
        log::debug!("Deck unlocked");
        Outcome::Applied
    }

    /// Lock when unlocked, unlock when locked.
    pub fn toggle_lock(&mut self) -> Outcome {
        if self.is_locked {
            self.unlock()
        } else {
            self.lock()
        }
    }

    // === Zone transitions ===

    /// Materialize the library in canonical order. Hand and discard are
    /// cleared so the zones hold exactly the configured multiset.
    pub fn build_deck(&mut self) -> Outcome {
        if !self.is_locked {
            return Outcome::precondition(Precondition::DeckUnlocked);
        }
        let deck = self.deck_array();
        self.zones.clear();
        self.zones.library = deck;
        self.play = PlayState::Idle;
        self.has_built_deck = true;
        self.has_shuffled_deck = false;
        Outcome::Applied
    }

    /// Shuffle the library. Marks the deck shuffled when locked.
    pub fn shuffle_deck(&mut self) -> Outcome {
        self.rng.shuffle(&mut self.zones.library);
        if self.is_locked {
            self.has_shuffled_deck = true;
        }
        Outcome::Applied
    }

    /// Engine draw: requires a locked deck and hand space.
    ///
    /// Materializes a fresh shuffled deck when every zone is empty, and
    /// reshuffles the discard when only the library is empty.
    pub fn draw(&mut self) -> Outcome {
        if !self.is_locked {
            return Outcome::precondition(Precondition::DrawRequiresLock);
        }
        let materializing = self.zones.is_empty();
        let deck = &self.config;
        let null_id = self.catalog.null_id();
        let outcome = self
            .zones
            .draw(self.hand_limit, &mut self.rng, || build_deck_array(deck, null_id));
        if outcome.is_applied() && materializing {
            self.has_built_deck = true;
            self.has_shuffled_deck = true;
        }
        if let Some(refusal) = outcome.refusal() {
            log::debug!("Draw refused: {refusal:?}");
        }
        outcome
    }

    /// Caller-level draw: refuses with the first unmet of lock, build,
    /// shuffle, then performs the engine draw.
    pub fn handle_draw(&mut self) -> Outcome {
        if let Some(blocker) = self.draw_blocker() {
            return Outcome::precondition(blocker);
        }
        self.draw()
    }

    /// Move the first (or every) copy of `card_id` from hand to discard.
    pub fn discard_from_hand(&mut self, card_id: &str, all: bool, origin: DiscardOrigin) -> Outcome {
        self.zones.discard_from_hand(card_id, all, origin)
    }

    /// Move the whole discard back into the library.
    pub fn return_discard_to_library(&mut self, shuffle: bool, to_top: bool) -> Outcome {
        self.zones.return_discard_to_library(shuffle, to_top, &mut self.rng)
    }

    /// Move one (or as many as fit) discarded copies of `card_id` to hand.
    pub fn return_discard_group_to_hand(&mut self, card_id: &str, all: bool) -> Outcome {
        self.zones.return_discard_group_to_hand(card_id, all, self.hand_limit)
    }

    /// Move the discard entry at `index` to hand.
    pub fn return_discard_item_to_hand(&mut self, index: usize) -> Outcome {
        self.zones.return_discard_item_to_hand(index, self.hand_limit)
    }

    /// Move the discard entry at `index` onto the library top.
    pub fn return_discard_item_to_library(&mut self, index: usize) -> Outcome {
        self.zones.return_discard_item_to_library(index)
    }

    /// Move one (or every) discarded copy of `card_id` onto the library top.
    pub fn return_discard_group_to_library(&mut self, card_id: &str, all: bool) -> Outcome {
        self.zones.return_discard_group_to_library(card_id, all)
    }

    /// Mill up to `count` cards from the library top into discard.
    pub fn discard_from_library(&mut self, count: usize) -> Outcome {
        self.zones.discard_from_library(count)
    }

    /// Hard reset: shuffled fresh library, empty hand and discard.
    pub fn reset_deck(&mut self) -> Outcome {
        if !self.is_locked {
            return Outcome::precondition(Precondition::DeckUnlocked);
        }
        let deck = self.deck_array();
        self.zones.reset(deck, &mut self.rng);
        self.play = PlayState::Idle;
        self.has_built_deck = true;
        self.has_shuffled_deck = true;
        Outcome::Applied
    }

    // === Play flow ===

    fn is_null(&self, card_id: &str) -> bool {
        self.catalog
            .null_id()
            .is_some_and(|null| null.as_str() == card_id)
    }

    fn in_hand(&self, card_id: &str) -> bool {
        self.zones.hand.iter().any(|h| h.id.as_str() == card_id)
    }

    /// Select (or deselect) a base card from hand.
    pub fn start_play_base(&mut self, card_id: &str) -> Outcome {
        if self.is_null(card_id) {
            return Outcome::precondition(Precondition::NullCardNotPlayable);
        }
        if self.catalog.is_mod(card_id) {
            return Outcome::precondition(Precondition::NotABase);
        }
        if !self.catalog.is_base(card_id) {
            return Outcome::precondition(Precondition::UnknownCard);
        }
        if !self.in_hand(card_id) {
            return Outcome::precondition(Precondition::NothingToMove);
        }
        self.play = play::start_play_selection(&self.play, &CardId::new(card_id));
        Outcome::Applied
    }

    fn attach_guard(&self, card_id: &str) -> Option<Outcome> {
        if self.is_null(card_id) {
            return Some(Outcome::precondition(Precondition::NullCardNotPlayable));
        }
        if self.play.is_idle() {
            return Some(Outcome::precondition(Precondition::NoActivePlay));
        }
        if !self.catalog.is_mod(card_id) {
            return Some(Outcome::precondition(Precondition::UnknownCard));
        }
        None
    }

    /// Toggle a modifier on the active play.
    pub fn attach_modifier(&mut self, card_id: &str) -> Outcome {
        if let Some(refused) = self.attach_guard(card_id) {
            return refused;
        }
        let (next, outcome) = play::toggle_attach(
            &self.play,
            &CardId::new(card_id),
            &self.zones.hand_counts(),
            &self.catalog.costs(),
            self.config.modifier_capacity,
        );
        self.play = next;
        outcome
    }

    /// Attach one more copy of a modifier to the active play.
    pub fn attach_additional_modifier(&mut self, card_id: &str) -> Outcome {
        if let Some(refused) = self.attach_guard(card_id) {
            return refused;
        }
        let (next, outcome) = play::attach_additional(
            &self.play,
            &CardId::new(card_id),
            &self.zones.hand_counts(),
            &self.catalog.costs(),
            self.config.modifier_capacity,
        );
        self.play = next;
        outcome
    }

    /// Commit the active play: base and modifiers move from hand to
    /// discard tagged `Played`, and the flow returns to idle.
    pub fn finalize_play(&mut self) -> Outcome {
        let Some(selection) = play::finalize_selection(&self.play) else {
            return Outcome::precondition(Precondition::NoActivePlay);
        };
        self.zones
            .discard_from_hand(selection.base_id.as_str(), false, DiscardOrigin::Played);
        for m in &selection.mods {
            self.zones.discard_from_hand(m.as_str(), false, DiscardOrigin::Played);
        }
        log::debug!(
            "Played {} with {} modifier(s)",
            selection.base_id,
            selection.mods.len()
        );
        self.play = PlayState::Idle;
        Outcome::Applied
    }

    /// Abandon the active play; attached cards stay in hand.
    pub fn cancel_play(&mut self) -> Outcome {
        self.play = play::cancel_selection(&self.play);
        Outcome::Applied
    }

    // === Saved decks and resets ===

    /// Save the current configuration and library under `name`.
    pub fn save_deck(&mut self, name: &str, created_at: &str) -> Outcome {
        let saved = SavedDeck::new(name, &self.config, self.zones.library.clone(), created_at);
        self.saved_decks.insert(name.to_string(), saved);
        self.deck_name = name.to_string();
        Outcome::Applied
    }

    /// Load a saved configuration. The deck is unlocked and zones cleared.
    pub fn load_saved_deck(&mut self, name: &str) -> Outcome {
        let Some(saved) = self.saved_decks.get(name) else {
            return Outcome::precondition(Precondition::UnknownSavedDeck);
        };
        self.config = DeckConfiguration::restore(
            &self.catalog,
            &self.rules,
            &saved.base_counts,
            &saved.mod_counts,
            Some(saved.null_count),
            Some(saved.modifier_capacity),
        );
        self.deck_name = saved.name.clone();
        self.clear_zones();
        self.is_locked = false;
        Outcome::Applied
    }

    /// Delete a saved deck.
    pub fn delete_saved_deck(&mut self, name: &str) -> Outcome {
        match self.saved_decks.remove(name) {
            Some(_) => Outcome::Applied,
            None => Outcome::precondition(Precondition::UnknownSavedDeck),
        }
    }

    /// Replace the configuration with imported counts. Unknown ids are
    /// dropped; missing values fall back to the rules' defaults.
    pub fn apply_import(&mut self, imported: &crate::persist::ExportedDeck) -> Outcome {
        self.config = DeckConfiguration::restore(
            &self.catalog,
            &self.rules,
            &imported.base_counts.clone().unwrap_or_default(),
            &imported.mod_counts.clone().unwrap_or_default(),
            imported.null_count,
            imported.modifier_capacity,
        );
        if let Some(name) = &imported.name {
            self.deck_name = name.clone();
        }
        self.clear_zones();
        self.is_locked = false;
        Outcome::Applied
    }

    /// Restore the default configuration and unlock. Saved decks are kept.
    pub fn reset_builder(&mut self) -> Outcome {
        self.config = DeckConfiguration::new(&self.catalog, &self.rules);
        self.clear_zones();
        self.is_locked = false;
        self.deck_name.clear();
        self.hand_limit = self.rules.default_hand_limit;
        Outcome::Applied
    }
}
