//! Error types for import and persistence.
//!
//! Zone and play transitions never produce these; they report refusals
//! through [`Outcome`](super::Outcome) instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("Invalid deck format: {reason}")]
    InvalidFormat { reason: String },

    #[error("No deck data found")]
    NoDeckData,

    #[error("Invalid store key '{key}'")]
    InvalidKey { key: String },

    #[error("Saved deck '{name}' not found")]
    SavedDeckNotFound { name: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DeckError {
    pub fn invalid_format(reason: impl Into<String>) -> Self {
        DeckError::InvalidFormat {
            reason: reason.into(),
        }
    }
}

pub type DeckResult<T> = Result<T, DeckError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DeckError::NoDeckData.to_string(), "No deck data found");
        assert_eq!(
            DeckError::invalid_format("expected an object").to_string(),
            "Invalid deck format: expected an object"
        );
    }

    #[test]
    fn test_invalid_key_display() {
        let err = DeckError::InvalidKey {
            key: "../x".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid store key '../x'");
    }

    #[test]
    fn test_from_json() {
        let err: DeckError = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, DeckError::Json(_)));
    }
}
