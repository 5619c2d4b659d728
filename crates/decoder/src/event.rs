//! Event — assembles the outgoing event for one record.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::conf::JsonConfig;
use crate::parser::serde_utils::format_timestamp;
use crate::parser::{merge_json_fields, FieldMap, FieldValue, JSON_KEY, MESSAGE_KEY, TIMESTAMP_KEY};
use crate::reader::Message;

/// Outgoing event: a timestamp plus top-level fields.
///
/// Serializes as one flat object with `@timestamp` first.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub fields: FieldMap,
}

impl Serialize for Event {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(TIMESTAMP_KEY, &format_timestamp(&self.timestamp))?;
        for (k, v) in self.fields.iter().filter(|(k, _)| k.as_str() != TIMESTAMP_KEY) {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Build the event for `message`.
///
/// With JSON decoding configured and a non-empty decoded mapping attached
/// under `json`, the mapping is merged per `config` and the record text is
/// passed as the override for the message key. Otherwise the record text
/// becomes the `message` field.
pub fn build_event(message: Message, config: Option<&JsonConfig>) -> Event {
    let text = String::from_utf8_lossy(&message.content).into_owned();
    let mut fields = message.fields;
    let mut timestamp = message.ts;

    let decoded = match config {
        Some(config) => match fields.remove(JSON_KEY) {
            Some(FieldValue::Map(json)) if !json.is_empty() => Some((config, json)),
            Some(other) => {
                fields.insert(JSON_KEY.to_string(), other);
                None
            }
            None => None,
        },
        None => None,
    };

    match decoded {
        Some((config, mut json)) => {
            if let Some(ts) = merge_json_fields(&mut fields, &mut json, Some(&text), config) {
                timestamp = ts;
            }
            if !config.keys_under_root {
                fields.insert(JSON_KEY.to_string(), FieldValue::Map(json));
            }
        }
        None => {
            fields.insert(MESSAGE_KEY.to_string(), FieldValue::String(text));
        }
    }

    Event { timestamp, fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::TimeZone;

    use crate::parser::JsonDecoder;
    use crate::reader::{FakeReader, JsonReader, Reader};

    fn read_one(line: &str, config: &JsonConfig) -> Message {
        let mut fake = FakeReader::new();
        fake.push_line(line);
        let mut reader = JsonReader::new(fake, JsonDecoder::new(config.clone()));
        reader.next().unwrap()
    }

    #[test]
    fn test_plain_message_without_json() {
        let message = Message::new(Bytes::from_static(b"plain line"));
        let read_at = message.ts;

        let event = build_event(message, None);

        assert_eq!(event.timestamp, read_at);
        assert_eq!(event.fields.get(MESSAGE_KEY), Some(&FieldValue::from("plain line")));
    }

    #[test]
    fn test_nested_under_json() {
        let config = JsonConfig {
            message_key: "msg".to_string(),
            ..JsonConfig::default()
        };
        let event = build_event(read_one(r#"{"msg":"hello","lvl":"info"}"#, &config), Some(&config));

        let json = event.fields.get(JSON_KEY).and_then(FieldValue::as_map).unwrap();
        assert_eq!(json.get("msg"), Some(&FieldValue::from("hello")));
        assert_eq!(json.get("lvl"), Some(&FieldValue::from("info")));
        assert!(!event.fields.contains_key("lvl"));
    }

    #[test]
    fn test_merged_at_root_keeps_read_time() {
        let config = JsonConfig {
            keys_under_root: true,
            ..JsonConfig::default()
        };
        let line = r#"{"@timestamp":"2026-02-05T10:00:00Z","lvl":"warn","n":3}"#;
        let message = read_one(line, &config);
        let read_at = message.ts;

        let event = build_event(message, Some(&config));

        assert_eq!(event.timestamp, read_at);
        assert_eq!(event.fields.get("lvl"), Some(&FieldValue::from("warn")));
        assert_eq!(event.fields.get("n"), Some(&FieldValue::Int(3)));
        assert!(!event.fields.contains_key(JSON_KEY));
        assert!(!event.fields.contains_key(TIMESTAMP_KEY));
    }

    #[test]
    fn test_merged_at_root_overwrites_timestamp() {
        let config = JsonConfig {
            keys_under_root: true,
            overwrite_keys: true,
            ..JsonConfig::default()
        };
        let line = r#"{"@timestamp":"2026-02-05T10:00:00Z","lvl":"warn"}"#;
        let event = build_event(read_one(line, &config), Some(&config));

        assert_eq!(event.timestamp, Utc.with_ymd_and_hms(2026, 2, 5, 10, 0, 0).unwrap());
        assert_eq!(event.fields.get("lvl"), Some(&FieldValue::from("warn")));
        assert!(!event.fields.contains_key(TIMESTAMP_KEY));
    }

    #[test]
    fn test_decode_failure_restores_raw_line() {
        let config = JsonConfig {
            add_error_key: true,
            ignore_decoding_error: true,
            keys_under_root: true,
            ..JsonConfig::default()
        };
        let event = build_event(read_one("not json", &config), Some(&config));

        assert_eq!(event.fields.get(MESSAGE_KEY), Some(&FieldValue::from("not json")));
        assert!(event.fields.get("error").and_then(FieldValue::as_map).is_some());
    }

    #[test]
    fn test_silent_failure_keeps_null_json() {
        let config = JsonConfig {
            ignore_decoding_error: true,
            ..JsonConfig::default()
        };
        let event = build_event(read_one("not json", &config), Some(&config));

        assert_eq!(event.fields.get(JSON_KEY), Some(&FieldValue::Null));
        assert_eq!(event.fields.get(MESSAGE_KEY), Some(&FieldValue::from("not json")));
    }

    #[test]
    fn test_serialize_flat() {
        let mut fields = FieldMap::new();
        fields.insert("message".to_string(), FieldValue::from("hi"));
        fields.insert("n".to_string(), FieldValue::Int(42));
        let event = Event {
            timestamp: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            fields,
        };

        let json = serde_json::to_string(&event).unwrap();
        assert_eq!(json, r#"{"@timestamp":"2026-01-01T00:00:00.000Z","message":"hi","n":42}"#);
    }
}
