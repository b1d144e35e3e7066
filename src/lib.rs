//! # engram-deck
//!
//! Deck engine and play-flow state machine for the Collapse tabletop
//! companion.
//!
//! ## Design Principles
//!
//! 1. **Refuse, don't fail**: Every state transition returns an
//!    [`Outcome`]. A refused transition leaves the state exactly as it was
//!    and carries a reason callers can show to the user.
//!
//! 2. **Configuration Over Convention**: Base target, minimum nulls,
//!    capacity and hand limit come from [`DeckRules`], never from
//!    constants buried in the engine.
//!
//! 3. **Explicit state**: [`DeckBuilder`] owns all mutable state. Pure
//!    transitions (`zones`, `play`) are separate from the persistence
//!    commit step ([`persist::Session`]).
//!
//! ## Modules
//!
//! - `core`: Rules configuration, RNG, outcomes, errors
//! - `cards`: Card definitions and the catalog
//! - `deck`: Count maps, capacity arithmetic, deck configuration
//! - `zones`: Library, hand and discard, and transitions between them
//! - `play`: Base + modifier play selection
//! - `builder`: The deck builder state container
//! - `persist`: Snapshots, stores, import/export
//! - `world`: World events and meters

pub mod builder;
pub mod cards;
pub mod core;
pub mod deck;
pub mod persist;
pub mod play;
pub mod world;
pub mod zones;

// Re-export commonly used types
pub use crate::core::{
    CapacityMode, CounterMode, DeckError, DeckResult, DeckRng, DeckRngState, DeckRules, Limit,
    Outcome, Precondition, Refusal,
};

pub use crate::cards::{Card, CardCatalog, CardCategory, CardDetail, CardId, CardKind};

pub use crate::deck::{CountMap, DeckConfiguration, Validation};

pub use crate::zones::{DiscardEntry, DiscardOrigin, HandEntry, HandStatus, ZoneState};

pub use crate::play::{PlaySelection, PlayState};

pub use crate::builder::{DeckBuilder, SavedDeck};

pub use crate::persist::{
    ExportedDeck, FileStore, KeyValueStore, MemoryStore, Session, Snapshot, DEFAULT_STORAGE_KEY,
};

pub use crate::world::{MeterName, Meters, WorldEvent};
