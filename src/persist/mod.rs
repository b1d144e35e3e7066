//! Persistence: snapshots, key-value stores and deck import/export.
//!
//! ## Key Types
//!
//! - `Snapshot`: Serialized builder state
//! - `KeyValueStore`: String store trait, with `MemoryStore` and `FileStore`
//! - `Session`: Builder bound to a store key, committing after each change
//! - `ExportedDeck`: Single-deck exchange document

pub mod session;
pub mod snapshot;
pub mod store;
pub mod transfer;

pub use session::{Session, DEFAULT_STORAGE_KEY};
pub use snapshot::Snapshot;
pub use store::{FileStore, KeyValueStore, MemoryStore};
pub use transfer::{
    collect_store, export_all, export_deck, import_all, parse_imported_deck, validate_imported_deck,
    ExportedDeck, StoreImport, EXPORT_APP,
};
