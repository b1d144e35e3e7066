//! Zone system for card locations.
//!
//! A deck in play lives in three zones: the library (draw pile, a stack),
//! the hand (bounded by the hand limit) and the discard pile.
//!
//! ## Key Types
//!
//! - `ZoneState`: The three zones and their transitions
//! - `HandEntry` / `HandStatus`: A card in hand
//! - `DiscardEntry` / `DiscardOrigin`: A card in discard and how it got there
//! - `build_deck_array`: Materialize a configuration into card ids

pub mod engine;
pub mod state;

pub use engine::{build_deck_array, build_shuffled};
pub use state::{
    group_counts, returnable_count, DiscardEntry, DiscardOrigin, HandEntry, HandStatus, ZoneState,
};
