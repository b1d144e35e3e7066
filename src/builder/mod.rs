//! Deck builder: configuration, zones and play flow behind one owner.
//!
//! ## Key Types
//!
//! - `DeckBuilder`: The state container every operation runs against
//! - `SavedDeck`: A configuration saved under a name

pub mod saved;
pub mod state;

pub use saved::SavedDeck;
pub use state::DeckBuilder;
