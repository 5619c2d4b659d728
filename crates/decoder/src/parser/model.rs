use thiserror::Error;

use super::value::{FieldMap, FieldValue};

/// Reasons a record fails to decode cleanly.
///
/// None of these abort processing; the decoder maps each one to a fallback
/// and, when asked, to a [`JsonError`] annotation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DecodeError {
    /// Input is not valid JSON
    #[error("Error decoding JSON: {0}")]
    Parse(String),

    /// Input is valid JSON but the top level is not an object
    #[error("Error decoding JSON: expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    /// Configured message key absent from the decoded object
    #[error("Key '{0}' not found")]
    MissingKey(String),

    /// Configured message key present but not a string
    #[error("Value of key '{0}' is not a string")]
    NotAString(String),
}

/// Structured error annotation: always `{"message": ..., "type": "json"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonError {
    pub message: String,
}

impl JsonError {
    pub const TYPE: &'static str = "json";

    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }

    pub fn into_value(self) -> FieldValue {
        let mut map = FieldMap::new();
        map.insert("message".to_string(), FieldValue::String(self.message));
        map.insert("type".to_string(), FieldValue::from(Self::TYPE));
        FieldValue::Map(map)
    }
}

impl From<&DecodeError> for JsonError {
    fn from(err: &DecodeError) -> Self {
        JsonError::new(err.to_string())
    }
}

impl From<JsonError> for FieldValue {
    fn from(err: JsonError) -> Self {
        err.into_value()
    }
}
