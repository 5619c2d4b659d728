//! Record sources
//!
//! A [`Reader`] hands out one [`Message`] per call. Readers stack: the
//! [`JsonReader`] wraps any other reader and decodes each record it returns.

pub mod line;
pub mod json;
pub mod fake;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::parser::{FieldMap, FieldValue};

pub use line::LineReader;
pub use json::JsonReader;
pub use fake::FakeReader;

pub const MAX_LINE_SIZE: usize = 1_048_576; // 1MB

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("End of input")]
    Eof,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Line too large: {0} bytes (max: {1} bytes)")]
    LineTooLarge(usize, usize),
}

pub trait Reader: Send {
    /// Return the next record, or an error once input is exhausted or broken
    fn next(&mut self) -> Result<Message, ReadError>;
}

impl<R: Reader + ?Sized> Reader for Box<R> {
    fn next(&mut self) -> Result<Message, ReadError> {
        (**self).next()
    }
}

/// One record plus whatever fields readers attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Time the record was read
    pub ts: DateTime<Utc>,
    pub content: Bytes,
    /// Raw bytes consumed from the source, framing included
    pub bytes: usize,
    pub fields: FieldMap,
}

impl Message {
    pub fn new(content: Bytes) -> Self {
        Self {
            ts: Utc::now(),
            bytes: content.len(),
            content,
            fields: FieldMap::new(),
        }
    }

    /// No content and no attached fields
    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.fields.is_empty()
    }

    /// Deep-merge `fields` into the attached fields; nested maps merge
    /// key by key, anything else is replaced.
    pub fn add_fields(&mut self, fields: FieldMap) {
        deep_update(&mut self.fields, fields);
    }
}

fn deep_update(target: &mut FieldMap, source: FieldMap) {
    for (key, value) in source {
        match (target.get_mut(&key), value) {
            (Some(FieldValue::Map(existing)), FieldValue::Map(incoming)) => {
                deep_update(existing, incoming);
            }
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}
