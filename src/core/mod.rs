//! Core engine types: rules configuration, RNG, outcomes and errors.
//!
//! Everything here is independent of the card catalog. Callers configure
//! the engine with `DeckRules` rather than changing engine code.

pub mod config;
pub mod error;
pub mod outcome;
pub mod rng;

pub use config::{
    CapacityMode, CounterMode, DeckRules, DEFAULT_BASE_TARGET, DEFAULT_HAND_LIMIT,
    DEFAULT_MIN_NULLS, DEFAULT_MODIFIER_CAPACITY,
};
pub use error::{DeckError, DeckResult};
pub use outcome::{Limit, Outcome, Precondition, Refusal};
pub use rng::{DeckRng, DeckRngState};
