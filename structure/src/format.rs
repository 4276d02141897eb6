//! Text round-trip of individual values.
//!
//! Provides [`Format::encode`] and [`Format::decode`], which convert
//! between serde types and the text shown in a node's text editor.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// Errors raised while converting values to and from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("failed to serialize: {0}")]
    Serialize(String),
    #[error("failed to deserialize: {0}")]
    Deserialize(String),
}

/// Supported text formats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// RON (Rusty Object Notation), pretty-printed.
    #[default]
    Ron,
    /// JSON, pretty-printed.
    #[cfg(feature = "serialize-json")]
    Json,
}

impl Format {
    /// Pretty-prints `value`.
    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<String, CodecError> {
        match self {
            Format::Ron => ron::ser::to_string_pretty(value, ron::ser::PrettyConfig::default())
                .map_err(|e| CodecError::Serialize(e.to_string())),
            #[cfg(feature = "serialize-json")]
            Format::Json => {
                serde_json::to_string_pretty(value).map_err(|e| CodecError::Serialize(e.to_string()))
            }
        }
    }

    /// Parses `text` into a fresh value. Nothing is written on failure.
    pub fn decode<T: DeserializeOwned>(self, text: &str) -> Result<T, CodecError> {
        match self {
            Format::Ron => ron::from_str(text).map_err(|e| CodecError::Deserialize(e.to_string())),
            #[cfg(feature = "serialize-json")]
            Format::Json => {
                serde_json::from_str(text).map_err(|e| CodecError::Deserialize(e.to_string()))
            }
        }
    }
}
