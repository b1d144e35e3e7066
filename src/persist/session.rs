//! A builder bound to a store key.
//!
//! The session loads the snapshot once at startup, runs every
//! transition against the in-memory builder and then commits a fresh
//! snapshot. Store failures are logged and swallowed; the in-memory
//! builder stays authoritative.

use std::sync::Arc;

use serde_json::Value;

use super::snapshot::Snapshot;
use super::store::KeyValueStore;
use super::transfer::{export_deck, validate_imported_deck, ExportedDeck};
use crate::builder::DeckBuilder;
use crate::cards::CardCatalog;
use crate::core::config::DeckRules;
use crate::core::error::{DeckError, DeckResult};
use crate::core::outcome::Outcome;
use crate::core::rng::DeckRng;

/// Store key used by the player deck builder.
pub const DEFAULT_STORAGE_KEY: &str = "collapse.deck-builder.v2";

/// Deck builder plus the store it mirrors to.
#[derive(Debug)]
pub struct Session<S: KeyValueStore> {
    builder: DeckBuilder,
    store: S,
    key: String,
}

fn load_snapshot<S: KeyValueStore>(store: &S, key: &str) -> DeckResult<Option<Snapshot>> {
    match store.get(key)? {
        Some(raw) if !raw.is_empty() => Ok(Some(serde_json::from_str(&raw)?)),
        _ => Ok(None),
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Open a session, restoring the snapshot under `key` if one loads.
    /// A missing or unreadable snapshot yields a default builder.
    pub fn open(
        store: S,
        key: impl Into<String>,
        catalog: Arc<CardCatalog>,
        rules: DeckRules,
        rng: DeckRng,
    ) -> Self {
        let key = key.into();
        let builder = match load_snapshot(&store, &key) {
            Ok(Some(snapshot)) => {
                log::debug!("Restored deck builder from '{key}'");
                snapshot.restore(catalog, rules, rng)
            }
            Ok(None) => DeckBuilder::new(catalog, rules, rng),
            Err(err) => {
                log::warn!("Ignoring unreadable snapshot '{key}': {err}");
                DeckBuilder::new(catalog, rules, rng)
            }
        };
        Self { builder, store, key }
    }

    #[must_use]
    pub fn builder(&self) -> &DeckBuilder {
        &self.builder
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Give back the builder and the store.
    pub fn into_parts(self) -> (DeckBuilder, S) {
        (self.builder, self.store)
    }

    /// Run a transition and commit when it applied.
    pub fn apply<F>(&mut self, transition: F) -> Outcome
    where
        F: FnOnce(&mut DeckBuilder) -> Outcome,
    {
        let outcome = transition(&mut self.builder);
        if outcome.is_applied() {
            self.commit();
        }
        outcome
    }

    /// Write the current snapshot. Failures are logged, not returned.
    pub fn commit(&mut self) {
        if let Err(err) = self.try_commit() {
            log::warn!("Failed to persist '{}': {err}", self.key);
        }
    }

    /// Write the current snapshot, reporting failures.
    pub fn try_commit(&mut self) -> DeckResult<()> {
        let json = serde_json::to_string(&self.builder.snapshot())?;
        self.store.set(&self.key, &json)
    }

    /// Validate `raw` and replace the configuration with it. Nothing
    /// changes when validation fails.
    pub fn import_deck(&mut self, raw: &Value) -> DeckResult<ExportedDeck> {
        let imported = validate_imported_deck(raw, self.builder.catalog())?;
        log::info!(
            "Importing deck {}",
            imported.name.as_deref().unwrap_or("(unnamed)")
        );
        self.apply(|b| b.apply_import(&imported));
        Ok(imported)
    }

    /// Export the current deck.
    #[must_use]
    pub fn export_deck(&self, created_at: &str) -> ExportedDeck {
        export_deck(&self.builder, created_at)
    }

    /// Export a saved deck by name.
    pub fn export_saved_deck(&self, name: &str) -> DeckResult<ExportedDeck> {
        let saved = self
            .builder
            .saved_decks()
            .get(name)
            .ok_or_else(|| DeckError::SavedDeckNotFound {
                name: name.to_string(),
            })?;
        Ok(ExportedDeck {
            name: Some(saved.name.clone()),
            deck: Some(saved.deck.clone()),
            base_counts: Some(saved.base_counts.clone()),
            mod_counts: Some(saved.mod_counts.clone()),
            null_count: Some(saved.null_count),
            modifier_capacity: Some(saved.modifier_capacity),
            created_at: (!saved.created_at.is_empty()).then(|| saved.created_at.clone()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::persist::MemoryStore;
    use serde_json::json;

    fn catalog() -> Arc<CardCatalog> {
        Arc::new(
            CardCatalog::new()
                .with_base(Card::new("b1", "Base 1"))
                .with_mod(Card::new("m1", "Mod 1").with_cost(1))
                .with_null(Card::new("null", "Null")),
        )
    }

    fn rules() -> DeckRules {
        DeckRules::new().with_base_target(2).with_min_nulls(1)
    }

    fn open(store: MemoryStore) -> Session<MemoryStore> {
        Session::open(store, DEFAULT_STORAGE_KEY, catalog(), rules(), DeckRng::new(5))
    }

    #[test]
    fn test_applied_transitions_are_committed() {
        let mut session = open(MemoryStore::new());
        assert!(session.store().is_empty());

        assert!(session.apply(|b| b.adjust_base_count("b1", 2)).is_applied());
        assert!(session.store().get(DEFAULT_STORAGE_KEY).unwrap().is_some());

        let (_, store) = session.into_parts();
        let reopened = open(store);
        assert_eq!(reopened.builder().config().base_counts.get("b1"), Some(&2));
    }

    #[test]
    fn test_refusals_are_not_committed() {
        let mut session = open(MemoryStore::new());
        let out = session.apply(|b| b.adjust_base_count("b1", 5));
        assert!(!out.is_applied());
        assert!(session.store().is_empty());
    }

    #[test]
    fn test_corrupt_snapshot_falls_back_to_defaults() {
        let mut store = MemoryStore::new();
        store.set(DEFAULT_STORAGE_KEY, "{not json").unwrap();
        let session = open(store);
        assert_eq!(session.builder().config().base_total(), 0);
        assert_eq!(session.builder().hand_limit(), 5);
    }

    #[test]
    fn test_null_field_keeps_other_state() {
        let mut store = MemoryStore::new();
        store
            .set(DEFAULT_STORAGE_KEY, r#"{"baseCounts":{"b1":7},"deckName":"mine","deck":null}"#)
            .unwrap();
        let session = open(store);
        assert_eq!(session.builder().config().base_counts.get("b1"), Some(&7));
        assert_eq!(session.builder().deck_name(), "mine");
        assert!(session.builder().zones().library.is_empty());
    }

    struct FailingStore;

    impl KeyValueStore for FailingStore {
        fn get(&self, _key: &str) -> DeckResult<Option<String>> {
            Ok(None)
        }
        fn set(&mut self, _key: &str, _value: &str) -> DeckResult<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full").into())
        }
        fn remove(&mut self, _key: &str) -> DeckResult<()> {
            Ok(())
        }
        fn keys(&self) -> DeckResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_write_failures_are_swallowed() {
        let mut session = Session::open(FailingStore, "k", catalog(), rules(), DeckRng::new(1));
        assert!(session.apply(|b| b.adjust_base_count("b1", 1)).is_applied());
        assert_eq!(session.builder().config().base_total(), 1);
        assert!(session.try_commit().is_err());
    }

    #[test]
    fn test_import_replaces_configuration() {
        let mut session = open(MemoryStore::new());
        session.apply(|b| b.lock());

        let raw = json!({"name": "Imported", "baseCounts": {"b1": 2, "zz": 4}, "nullCount": 3});
        let imported = session.import_deck(&raw).unwrap();
        assert_eq!(imported.name.as_deref(), Some("Imported"));

        let b = session.builder();
        assert!(!b.is_locked());
        assert_eq!(b.config().base_counts.get("b1"), Some(&2));
        assert_eq!(b.config().null_count, 3);
        assert_eq!(b.deck_name(), "Imported");
    }

    #[test]
    fn test_import_with_huge_counts_validates() {
        let catalog = Arc::new(
            CardCatalog::new()
                .with_base(Card::new("b1", "Base 1"))
                .with_base(Card::new("b2", "Base 2"))
                .with_mod(Card::new("m1", "Mod 1").with_cost(3))
                .with_null(Card::new("null", "Null")),
        );
        let mut session = Session::open(MemoryStore::new(), "k", catalog, rules(), DeckRng::new(1));
        let raw = json!({
            "baseCounts": {"b1": 4_294_967_295u64, "b2": 1},
            "modCounts": {"m1": 2_000_000_000u64}
        });
        session.import_deck(&raw).unwrap();

        let v = session.builder().validation();
        assert_eq!(v.base_total, u32::MAX);
        assert_eq!(v.mod_used, u32::MAX);
        assert!(!v.is_valid());
        assert_eq!(session.builder().config().deck_size(), u32::MAX);
    }

    #[test]
    fn test_invalid_import_changes_nothing() {
        let mut session = open(MemoryStore::new());
        session.apply(|b| b.adjust_base_count("b1", 1));
        let before = session.builder().snapshot();

        assert!(session.import_deck(&json!({"foo": 1})).is_err());
        assert_eq!(session.builder().snapshot(), before);
    }

    #[test]
    fn test_export_saved_deck() {
        let mut session = open(MemoryStore::new());
        session.apply(|b| b.adjust_base_count("b1", 2));
        session.apply(|b| b.save_deck("two", "2026-10-19"));

        let exported = session.export_saved_deck("two").unwrap();
        assert_eq!(exported.base_counts.unwrap().get("b1"), Some(&2));
        assert_eq!(exported.created_at.as_deref(), Some("2026-10-19"));
        assert!(matches!(
            session.export_saved_deck("missing"),
            Err(DeckError::SavedDeckNotFound { .. })
        ));
    }
}
