//! Error types for the show core.
//!
//! Nothing in the sequence model, interpolator or compiler fails. Errors only
//! come from input validation at the edges and from the storage collaborator.

use thiserror::Error;

/// A color string that is not a 6-digit hex triplet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    #[error("invalid hex color {0:?} (expected #RRGGBB)")]
    InvalidHex(String),
}

/// Rejected update to a mission settings field. The previous value is kept.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettingsError {
    #[error("unknown settings field {0:?}")]
    UnknownField(String),

    #[error("{field}: {value:?} is not a number")]
    NotANumber { field: &'static str, value: String },

    #[error("{field}: {value} is outside {min}..={max}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

/// Failure talking to the key-value store that holds the sequence library.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid storage key {0:?}")]
    InvalidKey(String),
}

/// Failure encoding or decoding a mission document.
#[derive(Debug, Error)]
pub enum MissionError {
    #[error("mission json error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_error_messages_name_the_field() {
        let err = SettingsError::NotANumber {
            field: "homeLat",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "homeLat: \"abc\" is not a number");

        let err = SettingsError::OutOfRange {
            field: "homeLat",
            value: 91.0,
            min: -90.0,
            max: 90.0,
        };
        assert!(err.to_string().contains("outside -90..=90"));
    }

    #[test]
    fn store_error_wraps_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: StoreError = io.into();
        assert!(matches!(err, StoreError::Io(_)));
    }
}
