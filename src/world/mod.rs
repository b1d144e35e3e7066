//! World events and meters.
//!
//! A GM selects world events; each event nudges one or more meters.
//! Meter values are always recomputed from the selection, never stored.
//!
//! ## Key Types
//!
//! - `MeterName` / `Meters`: The seven world meters
//! - `WorldEvent` / `MeterEffect`: An event and its signed meter changes

pub mod events;
pub mod meters;

pub use events::{
    apply_event_effects, builtin_events, events_from_json, toggle_selection, MeterEffect, WorldEvent,
};
pub use meters::{MeterName, Meters};
