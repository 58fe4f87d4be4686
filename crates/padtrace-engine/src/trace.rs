//! Canonical trace file format.
//!
//! One line per retained event: a zero-padded 16-digit relative timestamp,
//! a space, and the trimmed event text. Written from the dominant circuit of
//! a log, read back for WF encoding and overhead counting.

use std::fs;
use std::path::Path;

use padtrace_types::{Circuit, CircuitTable, EventKind};

use crate::error::{Error, Result};

/// One line of a canonical trace file, event kind re-resolved on read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub timestamp: i64,
    pub kind: EventKind,
    pub event: String,
}

impl TraceEvent {
    pub fn new(timestamp: i64, event: impl Into<String>) -> Self {
        let event = event.into();
        let kind = EventKind::classify(&event);
        Self {
            timestamp,
            kind,
            event,
        }
    }
}

/// Render a circuit as trace file lines (without trailing newlines).
///
/// Timestamps in the table are relative to the per-log base; here they are
/// rebased once more so the written circuit's own first event is exactly 0.
pub fn format_trace(table: &CircuitTable, circuit: &Circuit) -> Vec<String> {
    let mut base: Option<i64> = None;
    table
        .events(circuit)
        .map(|record| {
            let base = *base.get_or_insert(record.timestamp);
            format!("{:016} {}", record.timestamp - base, record.event.trim())
        })
        .collect()
}

/// Write a circuit's trace file.
pub fn write_trace(path: &Path, table: &CircuitTable, circuit: &Circuit) -> Result<()> {
    let mut out = format_trace(table, circuit).join("\n");
    if !out.is_empty() {
        out.push('\n');
    }
    fs::write(path, out)?;
    Ok(())
}

/// Parse one trace file line back into an event.
pub fn parse_trace_line(line: &str) -> Result<TraceEvent> {
    let line = line.trim_end();
    let (timestamp_str, event) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| Error::Format(format!("trace line with fewer than two fields: {line:?}")))?;
    let timestamp: i64 = timestamp_str
        .parse()
        .map_err(|_| Error::Format(format!("bad trace timestamp {timestamp_str:?}")))?;
    Ok(TraceEvent::new(timestamp, event.trim()))
}

/// Read a whole trace file, skipping blank lines.
pub fn read_trace(path: &Path) -> Result<Vec<TraceEvent>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(parse_trace_line)
        .collect()
}
