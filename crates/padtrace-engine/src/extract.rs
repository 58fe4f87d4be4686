//! Aggregation of parsed log lines into a per-file circuit table.

use padtrace_types::{CircuitTable, EventRecord, TraceSource};

use crate::classify;
use crate::error::{Error, Result};
use crate::parse::parse_line;
use crate::sanitize;

/// Options steering one file's extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Drop records tagged `source=client` before aggregation.
    pub exclude_client: bool,
    /// Drop records tagged `source=relay` before aggregation.
    pub exclude_relay: bool,
    /// Keep circuits whose stream-opens only ever target IP literals.
    pub allow_ips: bool,
    /// Also drop the two side-effect cells after a client negotiation start.
    pub filter_client_negotiate: bool,
    /// Also drop the side-effect cell after a relay negotiation complete.
    pub filter_relay_negotiate: bool,
    /// Stream-open destinations that contaminate a circuit.
    pub blacklist: Vec<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            exclude_client: false,
            exclude_relay: false,
            allow_ips: false,
            filter_client_negotiate: false,
            filter_relay_negotiate: false,
            blacklist: padtrace_types::DEFAULT_BLACKLISTED_ADDRESSES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl ExtractOptions {
    fn excludes(&self, source: Option<TraceSource>) -> bool {
        match source {
            Some(TraceSource::Client) => self.exclude_client,
            Some(TraceSource::Relay) => self.exclude_relay,
            None => false,
        }
    }
}

/// Group trace events by circuit, timestamps rebased to one per-file base.
///
/// Source filtering happens before the base is taken: the base is the raw
/// timestamp of the first *retained* record anywhere in the file, so that
/// record lands at exactly 0. Records of other circuits keep their offset
/// from that same base; a circuit's own first event may therefore be
/// non-zero, which is intentional and never recomputed per circuit.
pub fn aggregate<'a, I>(lines: I, opts: &ExtractOptions) -> Result<CircuitTable>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = CircuitTable::new();
    let mut base: Option<i64> = None;

    for line in lines {
        let Some(raw) = parse_line(line)? else {
            continue;
        };
        if opts.excludes(raw.source) {
            continue;
        }

        let base = *base.get_or_insert(raw.timestamp);
        table.push(EventRecord::new(
            raw.circuit_id,
            raw.timestamp - base,
            raw.event,
        ));
    }

    Ok(table)
}

/// Full extraction pipeline for one log file: aggregate, classify, sanitize.
///
/// Fails with [`Error::EmptyTrace`] when no circuit survives classification,
/// which covers the no-marker-lines case as well.
pub fn extract_log_traces<'a, I>(lines: I, opts: &ExtractOptions) -> Result<CircuitTable>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut table = aggregate(lines, opts)?;

    classify::apply_filters(&mut table, opts)?;
    if table.is_empty() {
        return Err(Error::EmptyTrace("no valid circuits in log".to_string()));
    }

    sanitize::sanitize_circuits(&mut table, opts);
    Ok(table)
}
