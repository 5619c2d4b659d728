use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// Render a timestamp as RFC 3339 with millisecond precision and a `Z` suffix
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn serialize_timestamp<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_timestamp(ts))
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(s).map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Helper: serialize a timestamp via serde_json
    fn serialize(ts: &DateTime<Utc>) -> String {
        use serde::Serialize;

        #[derive(Serialize)]
        struct Wrapper<'a> {
            #[serde(serialize_with = "serialize_timestamp")]
            ts: &'a DateTime<Utc>,
        }

        serde_json::to_string(&Wrapper { ts }).unwrap()
    }

    #[test]
    fn test_serialize_millis() {
        let ts = Utc.with_ymd_and_hms(2026, 2, 5, 10, 0, 0).unwrap()
            + chrono::Duration::milliseconds(123);
        assert_eq!(serialize(&ts), r#"{"ts":"2026-02-05T10:00:00.123Z"}"#);
    }

    #[test]
    fn test_parse_with_offset() {
        let ts = parse_timestamp("2026-02-05T12:00:00+02:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 2, 5, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2026-02-05").is_err());
    }
}
