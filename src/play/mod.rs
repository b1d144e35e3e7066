//! Play flow: selecting a base card and attaching modifiers.
//!
//! ## Key Types
//!
//! - `PlayState`: `Idle` or `SelectingBase`
//! - `PlaySelection`: The base id and attached modifier ids
//!
//! The null card and "attach before base" guards are enforced by
//! [`DeckBuilder`](crate::builder::DeckBuilder) before these pure
//! transitions run.

pub mod selection;

pub use selection::{
    attach_additional, cancel_selection, finalize_selection, start_play_selection, toggle_attach,
    ModList, PlaySelection, PlayState,
};
