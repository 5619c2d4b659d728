//! JSON record decoding and event merging
//!
//! This module turns the raw bytes of one log record into structured fields
//! and folds those fields back into the event being built for that record.
//!
//! # Architecture
//!
//! - `value.rs`: Tagged dynamic value (`FieldValue`) and `FieldMap`
//! - `number.rs`: Literal-preserving parse plus integer/float classification
//! - `decode.rs`: Record decoder (message key extraction, error annotation)
//! - `merge.rs`: Root-level merge with timestamp and collision handling
//! - `model.rs`: Decode errors and the structured JSON error annotation
//! - `metrics.rs`: Decode outcome counters
//!
//! # Guarantees
//!
//! - No decode or merge path panics or returns a partially built mapping
//! - Integral literals never pass through `f64`
//! - Configuration is read-only; decoders are `Send + Sync`

pub mod value;
pub mod number;
pub mod decode;
pub mod merge;
pub mod model;
pub mod metrics;
pub(crate) mod serde_utils;

// Re-export commonly used types
pub use value::{FieldMap, FieldValue};
pub use decode::{Decoded, JsonDecoder};
pub use merge::merge_json_fields;
pub use model::{DecodeError, JsonError};
pub use metrics::DecodeMetrics;

/// Key the decoded mapping is attached under when not merged at root
pub const JSON_KEY: &str = "json";
/// Key holding the event timestamp inside a destination mapping
pub const TIMESTAMP_KEY: &str = "@timestamp";
/// Key carrying a structured decode error
pub const ERROR_KEY: &str = "error";
/// Key receiving the record text on the event
pub const MESSAGE_KEY: &str = "message";
/// Key whose overwrite is validated during root merge
pub const TYPE_KEY: &str = "type";
/// Event metadata; never merged from a record unless overwriting
pub const METADATA_KEY: &str = "@metadata";
