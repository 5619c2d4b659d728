//! Model — DecoderConfig and JsonConfig.

use serde::{Deserialize, Serialize};

use crate::reader::MAX_LINE_SIZE;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Longest accepted record, in bytes
    pub max_bytes: usize,
    /// JSON decoding; records pass through as plain text when absent
    pub json: Option<JsonConfig>,
}

/// JSON decoding options.
///
/// Read-only once built: decoders and the merger only ever borrow it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonConfig {
    /// Field whose string value becomes the record text; empty disables it
    pub message_key: String,
    /// Merge decoded fields into the event root instead of nesting under `json`
    pub keys_under_root: bool,
    /// Let decoded fields replace existing event fields during root merge
    pub overwrite_keys: bool,
    /// Attach a structured `error` field when decoding fails
    pub add_error_key: bool,
    /// Do not log decoding failures
    pub ignore_decoding_error: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_bytes: MAX_LINE_SIZE,
            json: None,
        }
    }
}

impl DecoderConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.max_bytes == 0 {
            return Err("max_bytes must be > 0".to_string());
        }
        if let Some(json) = &self.json {
            json.validate()?;
        }
        Ok(())
    }
}

impl JsonConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.message_key.trim() != self.message_key {
            return Err(format!(
                "json.message_key must not have surrounding whitespace: {:?}",
                self.message_key
            ));
        }
        Ok(())
    }
}
