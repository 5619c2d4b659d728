//! Fake — in-memory record source for tests.
//!
//! Provides a deterministic [`FakeReader`] that implements [`Reader`] over
//! canned messages and reports [`ReadError::Eof`] once they run out.

use std::collections::VecDeque;

use bytes::Bytes;

use super::{Message, ReadError, Reader};

#[derive(Debug, Default)]
pub struct FakeReader {
    messages: VecDeque<Message>,
    calls: usize,
}

impl FakeReader {
    /// Create an empty fake reader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a message.
    pub fn push(&mut self, message: Message) -> &mut Self {
        self.messages.push_back(message);
        self
    }

    /// Seed a message from a line of text.
    pub fn push_line(&mut self, line: &str) -> &mut Self {
        self.push(Message::new(Bytes::copy_from_slice(line.as_bytes())))
    }

    /// Number of `next()` calls so far, including the ones that failed.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl Reader for FakeReader {
    fn next(&mut self) -> Result<Message, ReadError> {
        self.calls += 1;
        self.messages.pop_front().ok_or(ReadError::Eof)
    }
}
