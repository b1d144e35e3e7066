//! Deck configuration: count maps, capacity arithmetic and validity.
//!
//! ## Key Types
//!
//! - `CountMap`: Card id to quantity, one per pool
//! - `DeckConfiguration`: Counts plus null count and modifier capacity
//! - `Validation`: The three independent validity checks

pub mod configuration;
pub mod counts;

pub use configuration::{DeckConfiguration, Validation};
pub use counts::{can_add_mod, capacity_used, initial_counts, mod_usage, total_of, CountMap};
