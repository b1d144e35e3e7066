//! Card system: definitions and catalog.
//!
//! ## Key Types
//!
//! - `CardId`: Identifier for catalog cards (one id, many physical copies)
//! - `CardKind`: Type tag (`base`, `mod`, `null`, or free-form)
//! - `Card`: Static card data (name, cost, text, details)
//! - `CardCatalog`: Read-only lookup over the base, modifier and null pools

pub mod catalog;
pub mod definition;

pub use catalog::{CardCatalog, CardCategory};
pub use definition::{Card, CardDetail, CardId, CardKind};
