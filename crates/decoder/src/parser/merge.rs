//! Merge decoded JSON fields into the event under construction.

use chrono::{DateTime, Utc};
use tracing::{trace, warn};

use crate::conf::JsonConfig;
use super::model::JsonError;
use super::serde_utils::parse_timestamp;
use super::value::{FieldMap, FieldValue};
use super::{ERROR_KEY, JSON_KEY, MESSAGE_KEY, METADATA_KEY, TIMESTAMP_KEY, TYPE_KEY};

/// Merge `json_fields` into `event` following the configured placement.
///
/// `text` is the record text as seen by the caller (possibly rewritten by a
/// later stage such as multiline joining); when a message key is configured
/// it always replaces that key's value in `json_fields`.
///
/// Returns the event timestamp to use, or `None` when the fields stay nested
/// or no timestamp is known. With `keys_under_root` unset, `event` is only
/// touched to restore the raw text of an error-only record, and the caller
/// is expected to attach `json_fields` under `"json"` itself.
pub fn merge_json_fields(
    event: &mut FieldMap,
    json_fields: &mut FieldMap,
    text: Option<&str>,
    config: &JsonConfig,
) -> Option<DateTime<Utc>> {
    if !config.message_key.is_empty() {
        if let Some(text) = text {
            json_fields.insert(config.message_key.clone(), FieldValue::from(text));
        }
    }

    // Decoding failed and only the error annotation is left: keep the raw line.
    if is_error_only(json_fields) {
        if let Some(text) = text {
            event.insert(MESSAGE_KEY.to_string(), FieldValue::from(text));
        }
    }

    if !config.keys_under_root {
        return None;
    }

    event.remove(JSON_KEY);
    let timestamp = event.remove(TIMESTAMP_KEY).and_then(extract_timestamp);

    write_json_keys(event, timestamp, json_fields, config.overwrite_keys)
}

fn is_error_only(fields: &FieldMap) -> bool {
    fields.len() == 1 && fields.get(ERROR_KEY).is_some_and(|v| !v.is_null())
}

/// Accepts a timestamp value or an RFC 3339 string.
fn extract_timestamp(value: FieldValue) -> Option<DateTime<Utc>> {
    match value {
        FieldValue::Timestamp(ts) => Some(ts),
        FieldValue::String(s) => parse_timestamp(&s).ok(),
        other => {
            trace!(kind = other.type_name(), "dropping unrecognized event timestamp");
            None
        }
    }
}

fn write_json_keys(
    event: &mut FieldMap,
    mut timestamp: Option<DateTime<Utc>>,
    json_fields: &FieldMap,
    overwrite: bool,
) -> Option<DateTime<Utc>> {
    for (key, value) in json_fields {
        if !overwrite {
            // Reserved keys are only ever taken from the record when overwriting
            if key == TIMESTAMP_KEY || key == METADATA_KEY || event.contains_key(key) {
                continue;
            }
            event.insert(key.clone(), value.clone());
            continue;
        }

        match key.as_str() {
            TIMESTAMP_KEY => match timestamp_override(value) {
                Ok(ts) => timestamp = Some(ts),
                Err(err) => {
                    warn!("JSON: Won't overwrite @timestamp: {}", err.message);
                    event.insert(ERROR_KEY.to_string(), err.into());
                }
            },
            TYPE_KEY => match type_override(value) {
                Ok(kind) => {
                    event.insert(key.clone(), FieldValue::from(kind));
                }
                Err(err) => {
                    warn!("JSON: Won't overwrite type: {}", err.message);
                    event.insert(ERROR_KEY.to_string(), err.into());
                }
            },
            _ => {
                event.insert(key.clone(), value.clone());
            }
        }
    }

    timestamp
}

fn timestamp_override(value: &FieldValue) -> Result<DateTime<Utc>, JsonError> {
    match value {
        FieldValue::Timestamp(ts) => Ok(*ts),
        FieldValue::String(s) => parse_timestamp(s).map_err(|_| {
            JsonError::new(format!("@timestamp not overwritten (parse error on {})", s))
        }),
        _ => Err(JsonError::new("@timestamp not overwritten (not string)")),
    }
}

fn type_override(value: &FieldValue) -> Result<&str, JsonError> {
    let kind = value
        .as_str()
        .ok_or_else(|| JsonError::new("type not overwritten (not string)"))?;
    if kind.is_empty() || kind.starts_with('_') {
        return Err(JsonError::new(format!("type not overwritten (invalid value [{}])", kind)));
    }
    Ok(kind)
}
