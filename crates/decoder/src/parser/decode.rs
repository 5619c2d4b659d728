use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, error};

use crate::conf::JsonConfig;
use super::metrics::{DecodeMetrics, DecodeOutcome};
use super::model::{DecodeError, JsonError};
use super::number::parse_object;
use super::value::{FieldMap, FieldValue};
use super::ERROR_KEY;

/// Result of decoding one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Text that replaces the record content: the message key's value, the
    /// original bytes when the record failed to parse, or empty.
    pub text: Bytes,
    /// Decoded fields. `None` only when parsing failed without `add_error_key`.
    pub fields: Option<FieldMap>,
}

/// JSON record decoder
///
/// Stateless apart from its counters; one instance can be shared across
/// threads and every call is independent.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    config: JsonConfig,
    metrics: Arc<DecodeMetrics>,
}

impl JsonDecoder {
    pub fn new(config: JsonConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(DecodeMetrics::new()),
        }
    }

    /// Share an existing metrics sink instead of a private one
    pub fn with_metrics(config: JsonConfig, metrics: Arc<DecodeMetrics>) -> Self {
        Self { config, metrics }
    }

    pub fn metrics(&self) -> &Arc<DecodeMetrics> {
        &self.metrics
    }

    /// Decode `raw` into replacement text and a field mapping.
    ///
    /// Never fails: every error degrades to a fallback text plus an optional
    /// `error` annotation in the fields.
    pub fn decode(&self, raw: Bytes) -> Decoded {
        let mut fields = match parse_object(&raw) {
            Ok(fields) => fields,
            Err(err) => {
                self.metrics.record(DecodeOutcome::from(&err), raw.len());
                if !self.config.ignore_decoding_error {
                    error!("{}", err);
                }
                let fields = self.config.add_error_key.then(|| error_fields(&err));
                return Decoded { text: raw, fields };
            }
        };

        match self.extract_message(&fields) {
            Ok(text) => {
                self.metrics.record(DecodeOutcome::Decoded, raw.len());
                Decoded { text, fields: Some(fields) }
            }
            Err(err) => {
                self.metrics.record(DecodeOutcome::from(&err), raw.len());
                debug!(message_key = %self.config.message_key, "{}", err);
                if self.config.add_error_key {
                    fields.insert(ERROR_KEY.to_string(), JsonError::from(&err).into());
                }
                Decoded { text: Bytes::new(), fields: Some(fields) }
            }
        }
    }

    fn extract_message(&self, fields: &FieldMap) -> Result<Bytes, DecodeError> {
        let key = &self.config.message_key;
        if key.is_empty() {
            return Ok(Bytes::new());
        }

        match fields.get(key) {
            None => Err(DecodeError::MissingKey(key.clone())),
            Some(FieldValue::String(s)) => Ok(Bytes::copy_from_slice(s.as_bytes())),
            Some(_) => Err(DecodeError::NotAString(key.clone())),
        }
    }
}

fn error_fields(err: &DecodeError) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert(ERROR_KEY.to_string(), JsonError::from(err).into());
    fields
}
