//! Number-preserving JSON parse.
//!
//! Phase one hands the bytes to `serde_json` built with `arbitrary_precision`,
//! so every numeric literal is kept as its original text. Phase two walks the
//! generic value and classifies each literal by shape: no fraction and no
//! exponent means integer, anything else is a float.

use serde_json::{Map, Number, Value};

use super::model::DecodeError;
use super::value::{FieldMap, FieldValue};

/// Parse `raw` as a single top-level JSON object with normalized numbers.
///
/// The object must be the whole record: surrounding whitespace is allowed,
/// but anything after the closing brace (`{"a":1} x`) is a parse failure
/// rather than silently dropped.
pub fn parse_object(raw: &[u8]) -> Result<FieldMap, DecodeError> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| DecodeError::Parse(e.to_string()))?;

    match value {
        Value::Object(obj) => Ok(normalize_object(obj)),
        other => Err(DecodeError::NotAnObject(json_kind(&other))),
    }
}

/// Convert a generic JSON value, classifying every number it contains.
pub fn normalize(value: Value) -> FieldValue {
    match value {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(b),
        Value::Number(n) => classify_number(&n),
        Value::String(s) => FieldValue::String(s),
        Value::Array(items) => FieldValue::Array(items.into_iter().map(normalize).collect()),
        Value::Object(obj) => FieldValue::Map(normalize_object(obj)),
    }
}

fn normalize_object(obj: Map<String, Value>) -> FieldMap {
    obj.into_iter().map(|(k, v)| (k, normalize(v))).collect()
}

/// Classify one numeric literal.
///
/// Integral literals become `Int` when they fit `i64`, `UInt` when they fit
/// `u64`, and otherwise keep their literal text. Floats that overflow `f64`
/// also keep their text.
pub fn classify_number(n: &Number) -> FieldValue {
    let literal = n.to_string();

    if literal.contains(['.', 'e', 'E']) {
        return match n.as_f64() {
            Some(f) => FieldValue::Float(f),
            None => FieldValue::String(literal),
        };
    }

    if let Some(i) = n.as_i64() {
        FieldValue::Int(i)
    } else if let Some(u) = n.as_u64() {
        FieldValue::UInt(u)
    } else {
        tracing::trace!(literal = %literal, "integer literal exceeds 64 bits, keeping text");
        FieldValue::String(literal)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
