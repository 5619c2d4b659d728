use std::sync::atomic::{AtomicU64, Ordering};
use serde::Serialize;

use super::model::DecodeError;

/// Outcome categories for a single decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    /// Object decoded (and message key, if configured, was a string)
    Decoded,
    /// Input was not a JSON object
    ParseFailure,
    /// Configured message key absent
    MissingKey,
    /// Configured message key held a non-string value
    NotAString,
}

impl From<&DecodeError> for DecodeOutcome {
    fn from(err: &DecodeError) -> Self {
        match err {
            DecodeError::Parse(_) | DecodeError::NotAnObject(_) => DecodeOutcome::ParseFailure,
            DecodeError::MissingKey(_) => DecodeOutcome::MissingKey,
            DecodeError::NotAString(_) => DecodeOutcome::NotAString,
        }
    }
}

/// Counters for decode outcomes.
///
/// All operations use `Ordering::Relaxed`; `snapshot()` reads are not atomic
/// across fields, which is fine for observability.
#[derive(Debug, Default)]
pub struct DecodeMetrics {
    pub decoded: AtomicU64,
    pub parse_failures: AtomicU64,
    pub missing_key: AtomicU64,
    pub not_a_string: AtomicU64,
    pub bytes_in: AtomicU64,
}

impl DecodeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one decode call. Called once per record.
    #[inline]
    pub fn record(&self, outcome: DecodeOutcome, raw_len: usize) {
        self.bytes_in.fetch_add(raw_len as u64, Ordering::Relaxed);
        match outcome {
            DecodeOutcome::Decoded => self.decoded.fetch_add(1, Ordering::Relaxed),
            DecodeOutcome::ParseFailure => self.parse_failures.fetch_add(1, Ordering::Relaxed),
            DecodeOutcome::MissingKey => self.missing_key.fetch_add(1, Ordering::Relaxed),
            DecodeOutcome::NotAString => self.not_a_string.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let decoded = self.decoded.load(Ordering::Relaxed);
        let parse_failures = self.parse_failures.load(Ordering::Relaxed);
        let missing_key = self.missing_key.load(Ordering::Relaxed);
        let not_a_string = self.not_a_string.load(Ordering::Relaxed);
        let total = decoded + parse_failures + missing_key + not_a_string;

        MetricsSnapshot {
            total,
            decoded,
            parse_failures,
            missing_key,
            not_a_string,
            bytes_in: self.bytes_in.load(Ordering::Relaxed),
            success_rate: if total > 0 {
                decoded as f64 / total as f64
            } else {
                1.0
            },
        }
    }
}

/// A read-only snapshot of decode metrics, serializable for logging.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub total: u64,
    pub decoded: u64,
    pub parse_failures: u64,
    pub missing_key: u64,
    pub not_a_string: u64,
    pub bytes_in: u64,
    pub success_rate: f64,
}
