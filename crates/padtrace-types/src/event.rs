//! Event model for circuit padding traces.
//!
//! Instrumented tor logs one `circpad_trace_event` line per padding-relevant
//! event. Event names are classified exactly once, against a closed table,
//! when a record is created. Later passes match on [`EventKind`] instead of
//! rescanning event text, so names that are substrings of other names (for
//! example `padding_sent` inside `nonpadding_sent`) can never be confused.

/// Marker substring identifying a trace event line in a tor log.
pub const TRACE_MARKER: &str = "circpad_trace_event";

/// Field prefixes inside a trace event line, in required order.
pub const TIMESTAMP_PREFIX: &str = "timestamp=";
pub const CIRC_ID_PREFIX: &str = "client_circ_id=";
pub const EVENT_PREFIX: &str = "event=";

/// Source tags embedded in simulator-produced lines.
pub const SOURCE_CLIENT_TAG: &str = "source=client";
pub const SOURCE_RELAY_TAG: &str = "source=relay";

/// Cell events carrying (or imitating) traffic.
pub const EVENT_NONPADDING_SENT: &str = "circpad_cell_event_nonpadding_sent";
pub const EVENT_NONPADDING_RECV: &str = "circpad_cell_event_nonpadding_received";
pub const EVENT_PADDING_SENT: &str = "circpad_cell_event_padding_sent";
pub const EVENT_PADDING_RECV: &str = "circpad_cell_event_padding_received";

/// Stream-open event whose argument is the destination address.
pub const EVENT_STREAM_OPEN: &str = "connection_ap_handshake_send_begin";

/// Padding-negotiation protocol events, never part of page-load traffic.
pub const EVENT_NEGOTIATE_START: &str = "circpad_negotiate_padding";
pub const EVENT_NEGOTIATE_DONE: &str = "circpad_padding_negotiated";
pub const EVENT_NEGOTIATE_LOGGING: &str = "circpad_negotiate_logging";

/// Destinations that mark a circuit as contaminated (tor-internal traffic).
pub const DEFAULT_BLACKLISTED_ADDRESSES: &[&str] = &["aus1.torproject.org"];

/// Origin of a trace event line, tagged by the circuit padding simulator.
///
/// Plain tor logs carry no tag; their records have no source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceSource {
    Client,
    Relay,
}

/// Which negotiation-protocol event a name matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NegotiationMarker {
    /// Client sends PADDING_NEGOTIATE to start negotiation.
    ClientStart,
    /// Relay answers PADDING_NEGOTIATED; negotiation is complete.
    RelayComplete,
    /// Machine-logging negotiation, client-side only.
    Logging,
}

/// Closed classification of event names, resolved once at parse time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    NonpaddingSent,
    NonpaddingReceived,
    PaddingSent,
    PaddingReceived,
    StreamOpen,
    Negotiation(NegotiationMarker),
    Other,
}

impl EventKind {
    /// Classify by exact match of the first whitespace-delimited token.
    ///
    /// Everything after the first token (for example the destination address
    /// of a stream-open event) is an argument and does not participate in
    /// classification.
    pub fn classify(event: &str) -> EventKind {
        let name = event.split_whitespace().next().unwrap_or("");
        match name {
            EVENT_NONPADDING_SENT => EventKind::NonpaddingSent,
            EVENT_NONPADDING_RECV => EventKind::NonpaddingReceived,
            EVENT_PADDING_SENT => EventKind::PaddingSent,
            EVENT_PADDING_RECV => EventKind::PaddingReceived,
            EVENT_STREAM_OPEN => EventKind::StreamOpen,
            EVENT_NEGOTIATE_START => EventKind::Negotiation(NegotiationMarker::ClientStart),
            EVENT_NEGOTIATE_DONE => EventKind::Negotiation(NegotiationMarker::RelayComplete),
            EVENT_NEGOTIATE_LOGGING => EventKind::Negotiation(NegotiationMarker::Logging),
            _ => EventKind::Other,
        }
    }

    /// True for cells travelling away from the client (padding or not).
    pub fn is_sent(&self) -> bool {
        matches!(self, EventKind::NonpaddingSent | EventKind::PaddingSent)
    }

    /// True for cells travelling towards the client (padding or not).
    pub fn is_received(&self) -> bool {
        matches!(
            self,
            EventKind::NonpaddingReceived | EventKind::PaddingReceived
        )
    }

    pub fn is_padding(&self) -> bool {
        matches!(self, EventKind::PaddingSent | EventKind::PaddingReceived)
    }

    pub fn is_negotiation(&self) -> bool {
        matches!(self, EventKind::Negotiation(_))
    }
}

/// One parsed trace event, immutable once produced.
///
/// `timestamp` is in log-native units; after aggregation it is relative to
/// the single per-log base (see the engine's extract pass). `event` keeps the
/// name plus any trailing arguments, trimmed of trailing whitespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub circuit_id: String,
    pub timestamp: i64,
    pub kind: EventKind,
    pub event: String,
}

impl EventRecord {
    pub fn new(circuit_id: impl Into<String>, timestamp: i64, event: impl Into<String>) -> Self {
        let event = event.into();
        let kind = EventKind::classify(&event);
        Self {
            circuit_id: circuit_id.into(),
            timestamp,
            kind,
            event,
        }
    }

    /// Destination address argument of a stream-open event, if present.
    pub fn stream_address(&self) -> Option<&str> {
        if self.kind != EventKind::StreamOpen {
            return None;
        }
        self.event.split_whitespace().nth(1)
    }
}
