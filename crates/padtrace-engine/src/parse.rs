//! Line parser for instrumented tor logs.
//!
//! Most log lines are irrelevant and skipped silently. A line containing the
//! trace marker must carry `timestamp=`, `client_circ_id=` and `event=`
//! sub-fields in that order; a marker line missing one of them is corrupt,
//! not skippable.

use padtrace_types::{
    CIRC_ID_PREFIX, EVENT_PREFIX, SOURCE_CLIENT_TAG, SOURCE_RELAY_TAG, TIMESTAMP_PREFIX,
    TRACE_MARKER, TraceSource,
};

use crate::error::{Error, Result};

/// One trace event as it appears in the log, timestamp still absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub circuit_id: String,
    pub timestamp: i64,
    pub source: Option<TraceSource>,
    pub event: String,
}

/// Parse one log line. `Ok(None)` means the line is not a trace event.
pub fn parse_line(line: &str) -> Result<Option<RawEvent>> {
    if !line.contains(TRACE_MARKER) {
        return Ok(None);
    }

    let source = if line.contains(SOURCE_CLIENT_TAG) {
        Some(TraceSource::Client)
    } else if line.contains(SOURCE_RELAY_TAG) {
        Some(TraceSource::Relay)
    } else {
        None
    };

    let (timestamp_str, rest) = token_field(line, TIMESTAMP_PREFIX, line)?;
    let (circuit_id, rest) = token_field(rest, CIRC_ID_PREFIX, line)?;
    let event = tail_field(rest, EVENT_PREFIX, line)?;

    let timestamp: i64 = timestamp_str.parse().map_err(|_| {
        Error::Format(format!(
            "bad timestamp {:?} in line: {}",
            timestamp_str,
            line.trim_end()
        ))
    })?;

    Ok(Some(RawEvent {
        circuit_id: circuit_id.to_string(),
        timestamp,
        source,
        event: event.to_string(),
    }))
}

/// Value running from just after `prefix` to the next whitespace, plus the
/// remainder of the haystack (so subsequent fields are matched in order).
fn token_field<'a>(haystack: &'a str, prefix: &str, line: &str) -> Result<(&'a str, &'a str)> {
    let start = haystack
        .find(prefix)
        .ok_or_else(|| missing(prefix, line))?
        + prefix.len();
    let rest = &haystack[start..];
    let value = match rest.find(char::is_whitespace) {
        Some(end) => &rest[..end],
        None => rest,
    };
    Ok((value, rest))
}

/// Value running from just after `prefix` to end-of-line, trimmed of
/// trailing whitespace.
fn tail_field<'a>(haystack: &'a str, prefix: &str, line: &str) -> Result<&'a str> {
    let start = haystack
        .find(prefix)
        .ok_or_else(|| missing(prefix, line))?
        + prefix.len();
    Ok(haystack[start..].trim_end())
}

fn missing(prefix: &str, line: &str) -> Error {
    Error::Format(format!("missing {} in line: {}", prefix, line.trim_end()))
}
