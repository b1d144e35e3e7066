//! Play-selection state machine.
//!
//! ```text
//!   Idle ──start(base)──▶ SelectingBase{base, mods}
//!     ▲                        │  toggle_attach / attach_additional
//!     └── finalize / cancel ───┘
//! ```
//!
//! Transitions are pure: they take the current state and return the
//! next one. Moving cards between zones on finalize is the caller's job.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::cards::CardId;
use crate::core::outcome::{Limit, Outcome, Precondition};
use crate::deck::CountMap;

/// Attached modifier ids. Most plays carry a handful.
pub type ModList = SmallVec<[CardId; 4]>;

/// A play in progress: one base plus attached modifiers.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaySelection {
    pub base_id: CardId,
    pub mods: ModList,
}

impl PlaySelection {
    /// Fresh selection with no modifiers.
    pub fn new(base_id: impl Into<CardId>) -> Self {
        Self {
            base_id: base_id.into(),
            mods: ModList::new(),
        }
    }

    /// Copies of `card_id` currently attached.
    #[must_use]
    pub fn attached_count(&self, card_id: &str) -> u32 {
        self.mods.iter().filter(|m| m.as_str() == card_id).count() as u32
    }

    /// Total cost of attached modifiers under `card_costs`.
    #[must_use]
    pub fn attached_cost(&self, card_costs: &CountMap) -> u32 {
        self.mods
            .iter()
            .map(|m| card_costs.get(m).copied().unwrap_or(0))
            .fold(0, u32::saturating_add)
    }
}

/// State of the play flow.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayState {
    /// No active play.
    #[default]
    Idle,
    /// Base chosen; zero or more modifiers attached.
    SelectingBase(PlaySelection),
}

impl PlayState {
    /// The active selection, if any.
    #[must_use]
    pub fn selection(&self) -> Option<&PlaySelection> {
        match self {
            PlayState::Idle => None,
            PlayState::SelectingBase(sel) => Some(sel),
        }
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self, PlayState::Idle)
    }

    /// Base id of the active selection.
    #[must_use]
    pub fn base_id(&self) -> Option<&CardId> {
        self.selection().map(|s| &s.base_id)
    }
}

/// Select `base_id` as the base of a new play.
///
/// Selecting the current base again deselects it (back to `Idle`).
/// Selecting a different base replaces the selection with a fresh one.
#[must_use]
pub fn start_play_selection(current: &PlayState, base_id: &CardId) -> PlayState {
    match current {
        PlayState::SelectingBase(sel) if &sel.base_id == base_id => PlayState::Idle,
        _ => PlayState::SelectingBase(PlaySelection::new(base_id.clone())),
    }
}

/// Toggle a modifier on the active play.
///
/// If `card_id` is attached, its most recent occurrence is detached.
/// Otherwise it is attached when a spare copy is in hand and its cost
/// fits in `capacity`.
#[must_use]
pub fn toggle_attach(
    current: &PlayState,
    card_id: &CardId,
    hand_counts: &CountMap,
    card_costs: &CountMap,
    capacity: u32,
) -> (PlayState, Outcome) {
    let Some(sel) = current.selection() else {
        return (current.clone(), Outcome::precondition(Precondition::NoActivePlay));
    };

    if let Some(idx) = sel.mods.iter().rposition(|m| m == card_id) {
        let mut next = sel.clone();
        next.mods.remove(idx);
        return (PlayState::SelectingBase(next), Outcome::Applied);
    }

    attach_additional(current, card_id, hand_counts, card_costs, capacity)
}

/// Attach one more copy of `card_id`, never detaching.
///
/// Refuses when every copy in hand is already attached, or when the
/// added cost would exceed `capacity`.
#[must_use]
pub fn attach_additional(
    current: &PlayState,
    card_id: &CardId,
    hand_counts: &CountMap,
    card_costs: &CountMap,
    capacity: u32,
) -> (PlayState, Outcome) {
    let Some(sel) = current.selection() else {
        return (current.clone(), Outcome::precondition(Precondition::NoActivePlay));
    };

    let in_hand = hand_counts.get(card_id).copied().unwrap_or(0);
    if in_hand <= sel.attached_count(card_id.as_str()) {
        return (current.clone(), Outcome::capacity(Limit::CopiesInHand));
    }

    let additional = card_costs.get(card_id).copied().unwrap_or(0);
    if sel.attached_cost(card_costs) + additional > capacity {
        return (current.clone(), Outcome::capacity(Limit::ModifierCapacity));
    }

    let mut next = sel.clone();
    next.mods.push(card_id.clone());
    (PlayState::SelectingBase(next), Outcome::Applied)
}

/// Snapshot of the active play for committing, or `None` when idle.
///
/// The caller moves the base and each modifier from hand to discard and
/// then sets the state back to `Idle`.
#[must_use]
pub fn finalize_selection(current: &PlayState) -> Option<PlaySelection> {
    current.selection().cloned()
}

/// Abandon the active play. No cards move.
#[must_use]
pub fn cancel_selection(_current: &PlayState) -> PlayState {
    PlayState::Idle
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::outcome::Refusal;

    fn id(s: &str) -> CardId {
        CardId::new(s)
    }

    fn counts(pairs: &[(&str, u32)]) -> CountMap {
        pairs.iter().map(|&(k, v)| (CardId::new(k), v)).collect()
    }

    fn mods_of(state: &PlayState) -> Vec<&str> {
        state.selection().unwrap().mods.iter().map(CardId::as_str).collect()
    }

    #[test]
    fn test_start_and_toggle_off() {
        let state = start_play_selection(&PlayState::Idle, &id("base1"));
        assert_eq!(state.base_id(), Some(&id("base1")));
        assert!(state.selection().unwrap().mods.is_empty());

        let state = start_play_selection(&state, &id("base1"));
        assert!(state.is_idle());
    }

    #[test]
    fn test_start_with_different_base_switches() {
        let state = start_play_selection(&PlayState::Idle, &id("base1"));
        let hand = counts(&[("m1", 1)]);
        let costs = counts(&[("m1", 1)]);
        let (state, _) = toggle_attach(&state, &id("m1"), &hand, &costs, 5);

        let state = start_play_selection(&state, &id("base2"));
        assert_eq!(state.base_id(), Some(&id("base2")));
        assert!(state.selection().unwrap().mods.is_empty());
    }

    #[test]
    fn test_attach_requires_active_play() {
        let (state, out) = toggle_attach(&PlayState::Idle, &id("m1"), &CountMap::new(), &CountMap::new(), 5);
        assert!(state.is_idle());
        assert_eq!(out.refusal(), Some(Refusal::Precondition(Precondition::NoActivePlay)));
    }

    #[test]
    fn test_attach_detach_symmetry() {
        let hand = counts(&[("mod1", 2)]);
        let costs = counts(&[("mod1", 2)]);
        let state = start_play_selection(&PlayState::Idle, &id("base1"));

        let (state, out) = toggle_attach(&state, &id("mod1"), &hand, &costs, 3);
        assert!(out.is_applied());
        assert_eq!(mods_of(&state), vec!["mod1"]);

        // A second copy is in hand, but 2 + 2 > 3.
        let (state, out) = attach_additional(&state, &id("mod1"), &hand, &costs, 3);
        assert_eq!(out.refusal(), Some(Refusal::Capacity(Limit::ModifierCapacity)));
        assert_eq!(mods_of(&state), vec!["mod1"]);

        let (state, out) = toggle_attach(&state, &id("mod1"), &hand, &costs, 3);
        assert!(out.is_applied());
        assert!(mods_of(&state).is_empty());
    }

    #[test]
    fn test_multiple_copies_detach_most_recent() {
        let hand = counts(&[("a", 2), ("b", 1)]);
        let costs = counts(&[("a", 1), ("b", 1)]);
        let state = start_play_selection(&PlayState::Idle, &id("base"));

        let (state, _) = attach_additional(&state, &id("a"), &hand, &costs, 10);
        let (state, _) = attach_additional(&state, &id("b"), &hand, &costs, 10);
        let (state, _) = attach_additional(&state, &id("a"), &hand, &costs, 10);
        assert_eq!(mods_of(&state), vec!["a", "b", "a"]);

        let (state, out) = attach_additional(&state, &id("a"), &hand, &costs, 10);
        assert_eq!(out.refusal(), Some(Refusal::Capacity(Limit::CopiesInHand)));

        let (state, _) = toggle_attach(&state, &id("a"), &hand, &costs, 10);
        assert_eq!(mods_of(&state), vec!["a", "b"]);
    }

    #[test]
    fn test_attach_refused_without_copies_in_hand() {
        let state = start_play_selection(&PlayState::Idle, &id("base"));
        let (state, out) = toggle_attach(&state, &id("m1"), &CountMap::new(), &counts(&[("m1", 0)]), 5);
        assert_eq!(out.refusal(), Some(Refusal::Capacity(Limit::CopiesInHand)));
        assert!(mods_of(&state).is_empty());
    }

    #[test]
    fn test_missing_cost_counts_as_zero() {
        let state = start_play_selection(&PlayState::Idle, &id("base"));
        let (state, out) = toggle_attach(&state, &id("free"), &counts(&[("free", 1)]), &CountMap::new(), 0);
        assert!(out.is_applied());
        assert_eq!(mods_of(&state), vec!["free"]);
    }

    #[test]
    fn test_finalize_and_cancel() {
        assert!(finalize_selection(&PlayState::Idle).is_none());

        let state = start_play_selection(&PlayState::Idle, &id("base"));
        let (state, _) = toggle_attach(&state, &id("m"), &counts(&[("m", 1)]), &counts(&[("m", 1)]), 1);
        let snapshot = finalize_selection(&state).unwrap();
        assert_eq!(snapshot.base_id, id("base"));
        assert_eq!(snapshot.mods.as_slice(), &[id("m")]);

        assert!(cancel_selection(&state).is_idle());
        assert!(cancel_selection(&PlayState::Idle).is_idle());
    }
}
