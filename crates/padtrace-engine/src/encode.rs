//! WF trace encoding.
//!
//! Maps a sanitized event sequence to the numeric formats WF classifiers
//! consume. Cells is the most common format; TimeCells prefixes the relative
//! timestamp; DirectionalTime multiplies time with the cell sign (the
//! Tik-Tok format).

use std::fmt;
use std::str::FromStr;

use crate::trace::TraceEvent;

/// Output format for website-fingerprinting samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WfFormat {
    /// `1` per sent cell, `-1` per received cell.
    Cells,
    /// `{timestamp} 1` / `{timestamp} -1`.
    Timecells,
    /// `{timestamp}` / `{-timestamp}`.
    Dirtime,
}

impl WfFormat {
    /// File extension appended to output names (without the dot).
    pub fn extension(&self) -> &'static str {
        match self {
            WfFormat::Cells => "cells",
            WfFormat::Timecells => "timecells",
            WfFormat::Dirtime => "dirtime",
        }
    }

    /// Lazily encode a trace, one line per sent/received cell event.
    ///
    /// Events that are neither sent nor received (stream-opens, leftovers
    /// the sanitizer kept as `Other`) contribute nothing. The iterator
    /// borrows the trace, so encoding can restart from a fresh call.
    pub fn encode<'a>(&self, trace: &'a [TraceEvent]) -> WfLines<'a> {
        WfLines {
            format: *self,
            events: trace.iter(),
        }
    }
}

impl fmt::Display for WfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for WfFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cells" => Ok(WfFormat::Cells),
            "timecells" => Ok(WfFormat::Timecells),
            "dirtime" => Ok(WfFormat::Dirtime),
            other => Err(format!(
                "invalid type {:?}, has to be one of cells, timecells, dirtime",
                other
            )),
        }
    }
}

/// Lazy line iterator produced by [`WfFormat::encode`].
#[derive(Debug, Clone)]
pub struct WfLines<'a> {
    format: WfFormat,
    events: std::slice::Iter<'a, TraceEvent>,
}

impl Iterator for WfLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        for event in self.events.by_ref() {
            let outgoing = if event.kind.is_sent() {
                true
            } else if event.kind.is_received() {
                false
            } else {
                continue;
            };

            let line = match (self.format, outgoing) {
                (WfFormat::Cells, true) => "1".to_string(),
                (WfFormat::Cells, false) => "-1".to_string(),
                (WfFormat::Timecells, true) => format!("{} 1", event.timestamp),
                (WfFormat::Timecells, false) => format!("{} -1", event.timestamp),
                (WfFormat::Dirtime, true) => format!("{}", event.timestamp),
                (WfFormat::Dirtime, false) => format!("{}", -event.timestamp),
            };
            return Some(line);
        }
        None
    }
}
