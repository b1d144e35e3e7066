//! Transition outcomes.
//!
//! Engine transitions never fail with an error. A transition either
//! applies, or is refused and leaves the state untouched. The refusal
//! reason is kept so callers can surface a message without re-deriving
//! the precondition themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of applying a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The state changed.
    Applied,
    /// The state is unchanged.
    Refused(Refusal),
}

impl Outcome {
    /// Check if the transition was applied.
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Outcome::Applied)
    }

    /// Get the refusal reason, if refused.
    #[must_use]
    pub fn refusal(self) -> Option<Refusal> {
        match self {
            Outcome::Applied => None,
            Outcome::Refused(r) => Some(r),
        }
    }

    /// Shorthand for a precondition refusal.
    #[must_use]
    pub fn precondition(p: Precondition) -> Self {
        Outcome::Refused(Refusal::Precondition(p))
    }

    /// Shorthand for a capacity refusal.
    #[must_use]
    pub fn capacity(l: Limit) -> Self {
        Outcome::Refused(Refusal::Capacity(l))
    }
}

/// Why a transition was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Refusal {
    /// A precondition of the transition does not hold.
    Precondition(Precondition),
    /// Applying the transition would exceed a limit.
    Capacity(Limit),
}

/// Preconditions checked by transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precondition {
    /// Operation requires an unlocked deck.
    DeckLocked,
    /// Operation requires a locked deck.
    DeckUnlocked,
    /// Draw requires a locked deck.
    DrawRequiresLock,
    /// Draw requires a built library.
    DeckNotBuilt,
    /// Draw requires a shuffled library.
    DeckNotShuffled,
    /// Card id is not in the catalog category the operation needs.
    UnknownCard,
    /// The null card can only be discarded.
    NullCardNotPlayable,
    /// Modifiers attach to a selected base; none is selected.
    NoActivePlay,
    /// A modifier was offered where a base is required.
    NotABase,
    /// No matching card in the source zone.
    NothingToMove,
    /// Library and discard are empty while cards are still in hand.
    NothingToDraw,
    /// Saved deck name not found.
    UnknownSavedDeck,
}

/// Limits enforced by transitions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Limit {
    /// Hand is at its limit.
    HandLimit,
    /// Base total would exceed the base target.
    BaseTarget,
    /// Modifier usage would exceed modifier capacity.
    ModifierCapacity,
    /// Every copy in hand is already attached.
    CopiesInHand,
}

impl fmt::Display for Refusal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Refusal::Precondition(p) => fmt::Display::fmt(p, f),
            Refusal::Capacity(l) => fmt::Display::fmt(l, f),
        }
    }
}

impl fmt::Display for Precondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Precondition::DeckLocked => "Unlock the deck to change its configuration.",
            Precondition::DeckUnlocked => "Lock the deck first.",
            Precondition::DrawRequiresLock => "Lock the deck before drawing.",
            Precondition::DeckNotBuilt => "Build the deck before drawing.",
            Precondition::DeckNotShuffled => "Shuffle the deck before drawing.",
            Precondition::UnknownCard => "Unknown card.",
            Precondition::NullCardNotPlayable => "Null cards can only be discarded.",
            Precondition::NoActivePlay => "Select a base before attaching modifiers.",
            Precondition::NotABase => "Select a base before playing modifiers.",
            Precondition::NothingToMove => "No matching card.",
            Precondition::NothingToDraw => "Nothing left to draw.",
            Precondition::UnknownSavedDeck => "Saved deck not found.",
        };
        f.write_str(msg)
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Limit::HandLimit => "Hand is full.",
            Limit::BaseTarget => "Base card target reached.",
            Limit::ModifierCapacity => "Modifier capacity exceeded.",
            Limit::CopiesInHand => "No more copies in hand to attach.",
        };
        f.write_str(msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_applied() {
        assert!(Outcome::Applied.is_applied());
        assert_eq!(Outcome::Applied.refusal(), None);
    }

    #[test]
    fn test_refusal_kinds_are_distinguishable() {
        let pre = Outcome::precondition(Precondition::NoActivePlay);
        let cap = Outcome::capacity(Limit::HandLimit);

        assert!(!pre.is_applied());
        assert!(matches!(pre.refusal(), Some(Refusal::Precondition(Precondition::NoActivePlay))));
        assert!(matches!(cap.refusal(), Some(Refusal::Capacity(Limit::HandLimit))));
    }

    #[test]
    fn test_messages() {
        let r = Refusal::Precondition(Precondition::NoActivePlay);
        assert_eq!(r.to_string(), "Select a base before attaching modifiers.");
        assert_eq!(Limit::HandLimit.to_string(), "Hand is full.");
        assert_eq!(Precondition::DeckUnlocked.to_string(), "Lock the deck first.");
        assert_eq!(Precondition::DrawRequiresLock.to_string(), "Lock the deck before drawing.");
    }
}
