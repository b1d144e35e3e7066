//! Card definitions - static catalog data.
//!
//! `Card` holds the immutable properties of a catalog entry: name,
//! capacity cost, type tag and descriptive text. The deck engine only
//! ever moves `CardId`s between zones; definitions are looked up in the
//! [`CardCatalog`](super::CardCatalog).

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a catalog card.
///
/// Identifies the kind of card ("Rewire"), not a physical copy. A deck
/// holds the same id once per copy.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for CardId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Card type tag.
///
/// Serialized as the plain lowercase tag. Unrecognized tags are kept
/// verbatim in `Other`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CardKind {
    /// Primary playable card, one per play.
    Base,
    /// Attachable modifier consuming capacity.
    Mod,
    /// Filler card; can only be discarded.
    Null,
    /// Free-form tag (gear, events, ...).
    Other(String),
}

impl From<String> for CardKind {
    fn from(s: String) -> Self {
        match s.to_ascii_lowercase().as_str() {
            "base" => CardKind::Base,
            "mod" => CardKind::Mod,
            "null" => CardKind::Null,
            _ => CardKind::Other(s),
        }
    }
}

impl From<CardKind> for String {
    fn from(kind: CardKind) -> Self {
        match kind {
            CardKind::Base => "base".to_string(),
            CardKind::Mod => "mod".to_string(),
            CardKind::Null => "null".to_string(),
            CardKind::Other(s) => s,
        }
    }
}

/// Labelled detail line ("Effect", "Target", "Rarity", ...).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardDetail {
    pub label: String,
    pub value: String,
}

impl CardDetail {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Static card definition.
///
/// ## Example
///
/// ```
/// use engram_deck::cards::{Card, CardKind};
///
/// let rewire = Card::new("m1", "Rewire")
///     .with_kind(CardKind::Mod)
///     .with_cost(2);
///
/// assert_eq!(rewire.cost_or_zero(), 2);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,

    /// Display name.
    pub name: String,

    /// Capacity cost. Absent costs count as 0.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<u32>,

    /// Type tag.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CardKind>,

    /// Rules text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Detail lines.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<CardDetail>,
}

impl Card {
    /// Create a new card with only an id and a name.
    #[must_use]
    pub fn new(id: impl Into<CardId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            cost: None,
            kind: None,
            text: None,
            details: Vec::new(),
        }
    }

    /// Set the capacity cost (builder pattern).
    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Set the type tag (builder pattern).
    #[must_use]
    pub fn with_kind(mut self, kind: CardKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Set the rules text (builder pattern).
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Add a detail line (builder pattern).
    #[must_use]
    pub fn with_detail(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.push(CardDetail::new(label, value));
        self
    }

    /// Capacity cost, treating an absent cost as 0.
    #[must_use]
    pub fn cost_or_zero(&self) -> u32 {
        self.cost.unwrap_or(0)
    }

    /// Is this card tagged as a base card?
    ///
    /// Untagged cards are treated as bases, matching the handbook's
    /// display fallback.
    #[must_use]
    pub fn is_base(&self) -> bool {
        matches!(self.kind, None | Some(CardKind::Base))
    }

    /// Is this card tagged as a null card?
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.kind == Some(CardKind::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_id() {
        let id = CardId::new("b1");
        assert_eq!(id.as_str(), "b1");
        assert_eq!(format!("{}", id), "b1");
        assert_eq!(CardId::from("b1"), id);
    }

    #[test]
    fn test_card_kind_tags() {
        assert_eq!(CardKind::from("Base".to_string()), CardKind::Base);
        assert_eq!(CardKind::from("mod".to_string()), CardKind::Mod);
        assert_eq!(CardKind::from("NULL".to_string()), CardKind::Null);
        assert_eq!(CardKind::from("gear".to_string()), CardKind::Other("gear".into()));
        assert_eq!(String::from(CardKind::Mod), "mod");
    }

    #[test]
    fn test_card_builder() {
        let card = Card::new("m1", "Mod 1")
            .with_kind(CardKind::Mod)
            .with_cost(3)
            .with_text("Overclock")
            .with_detail("Target", "Self");

        assert_eq!(card.cost_or_zero(), 3);
        assert!(!card.is_base());
        assert!(!card.is_null());
        assert_eq!(card.details.len(), 1);
    }

    #[test]
    fn test_missing_cost_is_zero() {
        let card = Card::new("b1", "Base 1");
        assert_eq!(card.cost_or_zero(), 0);
        assert!(card.is_base());
    }

    #[test]
    fn test_card_json_shape() {
        let json = r#"{"id":"n1","name":"Static","type":"null","cost":0}"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, CardId::new("n1"));
        assert!(card.is_null());
        assert_eq!(card.cost, Some(0));

        let out = serde_json::to_value(&card).unwrap();
        assert_eq!(out["type"], "null");
        assert!(out.get("details").is_none());
    }
}
