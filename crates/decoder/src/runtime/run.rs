//! Run — read records, build events, write one JSON event per line.

use std::io::{BufRead, Write};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::conf::DecoderConfig;
use crate::event::build_event;
use crate::parser::{DecodeMetrics, JsonDecoder};
use crate::reader::{JsonReader, LineReader, ReadError, Reader};

/// Counts reported once input is exhausted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub events: u64,
    pub skipped: u64,
}

/// Process `input` to completion, writing events to `output`.
///
/// Oversized lines are skipped; any other read or write error stops the run.
pub fn run<R, W>(
    config: &DecoderConfig,
    input: R,
    mut output: W,
) -> Result<RunSummary, Box<dyn std::error::Error>>
where
    R: BufRead + Send + 'static,
    W: Write,
{
    let metrics = Arc::new(DecodeMetrics::new());
    let lines = LineReader::new(input, config.max_bytes);
    let mut reader: Box<dyn Reader> = match &config.json {
        Some(json) => Box::new(JsonReader::new(
            lines,
            JsonDecoder::with_metrics(json.clone(), Arc::clone(&metrics)),
        )),
        None => Box::new(lines),
    };

    let mut summary = RunSummary::default();
    loop {
        let message = match reader.next() {
            Ok(message) => message,
            Err(ReadError::Eof) => break,
            Err(ReadError::LineTooLarge(size, max)) => {
                debug!(size, max, "skipping record");
                summary.skipped += 1;
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if message.is_empty() {
            summary.skipped += 1;
            continue;
        }

        let event = build_event(message, config.json.as_ref());
        serde_json::to_writer(&mut output, &event)?;
        output.write_all(b"\n")?;
        summary.events += 1;
    }
    output.flush()?;

    if config.json.is_some() {
        let snap = metrics.snapshot();
        if snap.parse_failures > 0 {
            warn!(parse_failures = snap.parse_failures, "some records were not valid JSON objects");
        }
        info!(
            total = snap.total,
            decoded = snap.decoded,
            missing_key = snap.missing_key,
            not_a_string = snap.not_a_string,
            "decode summary"
        );
    }
    info!(events = summary.events, skipped = summary.skipped, "input exhausted");

    Ok(summary)
}
