//! Deck import/export and whole-store transfer.
//!
//! Validation is pure: it reads a JSON value and either returns a
//! filtered [`ExportedDeck`] or an error, without touching any state.
//! Applying the result is the caller's job
//! ([`DeckBuilder::apply_import`](crate::builder::DeckBuilder::apply_import)).

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::store::KeyValueStore;
use crate::builder::DeckBuilder;
use crate::cards::{CardCatalog, CardId};
use crate::core::error::{DeckError, DeckResult};
use crate::deck::CountMap;

/// Application tag written into whole-store exports.
pub const EXPORT_APP: &str = "cvttweb";

/// A single deck as exchanged with other tools. Every field is optional.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedDeck {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deck: Option<Vec<CardId>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_counts: Option<CountMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mod_counts: Option<CountMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub null_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier_capacity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl ExportedDeck {
    /// Ids in the flat `deck` array that the catalog does not know.
    ///
    /// Validation keeps these; callers that want a strict import can
    /// reject or report them.
    #[must_use]
    pub fn unknown_deck_ids(&self, catalog: &CardCatalog) -> Vec<CardId> {
        self.deck
            .iter()
            .flatten()
            .filter(|id| !catalog.contains(id.as_str()))
            .cloned()
            .collect()
    }
}

fn count_value(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}

fn filter_counts(raw: &Map<String, Value>, known: impl Fn(&str) -> bool) -> CountMap {
    raw.iter()
        .filter(|(id, _)| known(id))
        .filter_map(|(id, v)| count_value(v).map(|n| (CardId::new(id.as_str()), n)))
        .collect()
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Validate an imported deck document against the catalog.
///
/// - The document must be an object.
/// - Count-map entries are kept only for known ids with non-negative
///   integer values.
/// - The `deck` array keeps every string element, known or not.
/// - At least one of `deck`, `baseCounts`, `modCounts` must be present.
pub fn validate_imported_deck(raw: &Value, catalog: &CardCatalog) -> DeckResult<ExportedDeck> {
    let Some(obj) = raw.as_object() else {
        return Err(DeckError::invalid_format("Invalid deck format"));
    };

    let mut exported = ExportedDeck {
        name: non_empty_str(obj.get("name")),
        created_at: non_empty_str(obj.get("createdAt")),
        null_count: obj.get("nullCount").and_then(count_value),
        modifier_capacity: obj.get("modifierCapacity").and_then(count_value),
        ..ExportedDeck::default()
    };

    if let Some(items) = obj.get("deck").and_then(Value::as_array) {
        exported.deck = Some(
            items
                .iter()
                .filter_map(Value::as_str)
                .map(CardId::new)
                .collect(),
        );
    }
    if let Some(map) = obj.get("baseCounts").and_then(Value::as_object) {
        exported.base_counts = Some(filter_counts(map, |id| catalog.is_base(id)));
    }
    if let Some(map) = obj.get("modCounts").and_then(Value::as_object) {
        exported.mod_counts = Some(filter_counts(map, |id| catalog.is_mod(id)));
    }

    if exported.deck.is_none() && exported.base_counts.is_none() && exported.mod_counts.is_none() {
        return Err(DeckError::NoDeckData);
    }
    Ok(exported)
}

/// Parse and validate an imported deck from JSON text.
pub fn parse_imported_deck(text: &str, catalog: &CardCatalog) -> DeckResult<ExportedDeck> {
    let raw: Value = serde_json::from_str(text)?;
    validate_imported_deck(&raw, catalog)
}

/// Export the builder's current deck.
#[must_use]
pub fn export_deck(builder: &DeckBuilder, created_at: &str) -> ExportedDeck {
    let config = builder.config();
    let name = builder.deck_name();
    ExportedDeck {
        name: (!name.is_empty()).then(|| name.to_string()),
        deck: Some(builder.zones().library.clone()),
        base_counts: Some(config.base_counts.clone()),
        mod_counts: Some(config.mod_counts.clone()),
        null_count: Some(config.null_count),
        modifier_capacity: Some(config.modifier_capacity),
        created_at: (!created_at.is_empty()).then(|| created_at.to_string()),
    }
}

/// Every key of `store` as a JSON map. Values that are not JSON are kept
/// as strings.
pub fn collect_store<S: KeyValueStore + ?Sized>(store: &S) -> DeckResult<Map<String, Value>> {
    let mut data = Map::new();
    for key in store.keys()? {
        if let Some(raw) = store.get(&key)? {
            let value: Value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
            data.insert(key, value);
        }
    }
    Ok(data)
}

/// Whole-store export document: `{ meta: { app, exportedAt }, data }`.
pub fn export_all<S: KeyValueStore + ?Sized>(store: &S, exported_at: &str) -> DeckResult<Value> {
    let data = collect_store(store)?;
    Ok(json!({
        "meta": { "app": EXPORT_APP, "exportedAt": exported_at },
        "data": data,
    }))
}

/// Result of a replace-all import.
#[derive(Clone, Debug, PartialEq)]
pub enum StoreImport {
    /// Confirmation declined; the store is untouched.
    Cancelled { backup: Value },
    /// The store was cleared and rewritten with `keys` entries.
    Replaced { backup: Value, keys: usize },
}

impl StoreImport {
    /// Store contents before the import.
    #[must_use]
    pub fn backup(&self) -> &Value {
        match self {
            StoreImport::Cancelled { backup } | StoreImport::Replaced { backup, .. } => backup,
        }
    }

    #[must_use]
    pub fn is_replaced(&self) -> bool {
        matches!(self, StoreImport::Replaced { .. })
    }
}

/// Replace every key of `store` with the entries of `document`.
///
/// `document` is either an export (`{ meta, data }`) or a plain key to
/// value map. A backup of the current contents is passed to `confirm`;
/// returning `false` cancels with no changes. Each value is written as
/// its JSON text. A key the store cannot hold fails the import before
/// anything is read or written.
pub fn import_all<S, F>(store: &mut S, document: &Value, confirm: F) -> DeckResult<StoreImport>
where
    S: KeyValueStore + ?Sized,
    F: FnOnce(&Value) -> bool,
{
    let Some(obj) = document.as_object() else {
        return Err(DeckError::invalid_format("Imported file is not a JSON object"));
    };
    let entries = obj.get("data").and_then(Value::as_object).unwrap_or(obj);
    for key in entries.keys() {
        store.check_key(key)?;
    }

    let backup = json!({ "data": collect_store(store)? });
    if !confirm(&backup) {
        log::info!("Store import cancelled");
        return Ok(StoreImport::Cancelled { backup });
    }

    store.clear()?;
    for (key, value) in entries {
        store.set(key, &serde_json::to_string(value)?)?;
    }
    log::info!("Imported {} store keys", entries.len());
    Ok(StoreImport::Replaced {
        backup,
        keys: entries.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use crate::persist::MemoryStore;

    fn catalog() -> CardCatalog {
        CardCatalog::new()
            .with_base(Card::new("b1", "Base 1"))
            .with_base(Card::new("b2", "Base 2"))
            .with_mod(Card::new("m1", "Mod 1"))
    }

    #[test]
    fn test_parses_deck_and_counts() {
        let raw = json!({
            "name": "My Deck",
            "deck": ["b1", "m1", "b2"],
            "baseCounts": {"b1": 2, "b2": 1},
            "modCounts": {"m1": 1},
            "nullCount": 5,
            "modifierCapacity": 10
        });
        let parsed = validate_imported_deck(&raw, &catalog()).unwrap();
        assert_eq!(parsed.name.as_deref(), Some("My Deck"));
        assert_eq!(parsed.deck.as_ref().map(Vec::len), Some(3));
        assert_eq!(parsed.base_counts.as_ref().unwrap().get("b1"), Some(&2));
        assert_eq!(parsed.mod_counts.as_ref().unwrap().get("m1"), Some(&1));
        assert_eq!(parsed.null_count, Some(5));
        assert_eq!(parsed.modifier_capacity, Some(10));
    }

    #[test]
    fn test_filters_unknown_count_ids_but_not_deck() {
        let raw = json!({
            "baseCounts": {"b1": 1, "unknown": 3},
            "modCounts": {"m1": 2, "unknownm": 2},
            "deck": ["b1", "unknown", "m1", 7]
        });
        let cat = catalog();
        let parsed = validate_imported_deck(&raw, &cat).unwrap();

        let base = parsed.base_counts.clone().unwrap();
        assert_eq!(base.len(), 1);
        assert_eq!(base.get("b1"), Some(&1));
        assert_eq!(parsed.mod_counts.clone().unwrap().len(), 1);

        let deck: Vec<_> = parsed.deck.clone().unwrap();
        assert_eq!(deck, vec![CardId::new("b1"), CardId::new("unknown"), CardId::new("m1")]);
        assert_eq!(parsed.unknown_deck_ids(&cat), vec![CardId::new("unknown")]);
    }

    #[test]
    fn test_non_numeric_counts_dropped() {
        let raw = json!({"baseCounts": {"b1": "3", "b2": -1}});
        let parsed = validate_imported_deck(&raw, &catalog()).unwrap();
        assert!(parsed.base_counts.unwrap().is_empty());
    }

    #[test]
    fn test_rejects_invalid_documents() {
        assert!(matches!(
            validate_imported_deck(&Value::Null, &catalog()),
            Err(DeckError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_imported_deck(&json!(123), &catalog()),
            Err(DeckError::InvalidFormat { .. })
        ));
        assert!(matches!(
            validate_imported_deck(&json!({"foo": "bar"}), &catalog()),
            Err(DeckError::NoDeckData)
        ));
        assert!(matches!(parse_imported_deck("{not json", &catalog()), Err(DeckError::Json(_))));
    }

    #[test]
    fn test_export_all_shape() {
        let mut store = MemoryStore::new();
        store.set("deck", r#"{"isLocked":false}"#).unwrap();
        store.set("mode", "player").unwrap();

        let doc = export_all(&store, "101926").unwrap();
        assert_eq!(doc["meta"]["app"], "cvttweb");
        assert_eq!(doc["meta"]["exportedAt"], "101926");
        assert_eq!(doc["data"]["deck"]["isLocked"], false);
        assert_eq!(doc["data"]["mode"], "player");
    }

    #[test]
    fn test_import_all_declined_leaves_store() {
        let mut store = MemoryStore::new();
        store.set("keep", "1").unwrap();

        let doc = json!({"data": {"other": 2}});
        let result = import_all(&mut store, &doc, |_| false).unwrap();

        assert!(!result.is_replaced());
        assert_eq!(result.backup()["data"]["keep"], 1);
        assert_eq!(store.keys().unwrap(), vec!["keep"]);
    }

    #[test]
    fn test_import_all_replaces_store() {
        let mut store = MemoryStore::new();
        store.set("old", "1").unwrap();

        let doc = json!({"a": {"x": 1}, "b": "text"});
        let mut seen = None;
        let result = import_all(&mut store, &doc, |backup| {
            seen = Some(backup.clone());
            true
        })
        .unwrap();

        assert_eq!(result, StoreImport::Replaced { backup: json!({"data": {"old": 1}}), keys: 2 });
        assert_eq!(seen.unwrap()["data"]["old"], 1);
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().as_deref(), Some(r#"{"x":1}"#));
        assert_eq!(store.get("b").unwrap().as_deref(), Some(r#""text""#));
    }

    #[test]
    fn test_import_all_rejects_non_object() {
        let mut store = MemoryStore::new();
        assert!(import_all(&mut store, &json!([1, 2]), |_| true).is_err());
    }
}
