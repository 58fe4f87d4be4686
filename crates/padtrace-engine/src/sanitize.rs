//! Removal of negotiation-protocol events and their side effects.
//!
//! Negotiation cells are protocol handshake, not page-load traffic, and are
//! always dropped. When requested, the cells a negotiation is known to put
//! on the wire right after its marker are dropped too: two after a
//! client-side negotiation start, one after a relay-side negotiation
//! complete. The state transition fires in-loop, at the moment the marker is
//! observed; deferring the check until after the loop (an old variant of
//! this filter) would miss markers followed by markers and is deliberately
//! not what this implements.

use padtrace_types::{Circuit, CircuitTable, EventKind, EventRecord, NegotiationMarker};

use crate::extract::ExtractOptions;

/// Filter state: either passing events through, or skipping a known number
/// of negotiation side effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SkipState {
    Normal,
    Skipping(u8),
}

impl SkipState {
    fn on_marker(self, marker: NegotiationMarker, opts: &ExtractOptions) -> SkipState {
        match marker {
            NegotiationMarker::ClientStart if opts.filter_client_negotiate => {
                SkipState::Skipping(2)
            }
            NegotiationMarker::RelayComplete if opts.filter_relay_negotiate => {
                SkipState::Skipping(1)
            }
            _ => self,
        }
    }

    fn on_event(self) -> (bool, SkipState) {
        match self {
            SkipState::Normal => (true, SkipState::Normal),
            SkipState::Skipping(1) => (false, SkipState::Normal),
            SkipState::Skipping(n) => (false, SkipState::Skipping(n - 1)),
        }
    }
}

/// Single forward pass over one circuit's event indices.
///
/// Idempotent: the output contains no negotiation markers, so a second pass
/// can never re-enter the skipping state.
pub fn sanitize_events(
    events: &[u32],
    arena: &[EventRecord],
    opts: &ExtractOptions,
) -> Vec<u32> {
    let mut state = SkipState::Normal;
    let mut result = Vec::with_capacity(events.len());

    for &idx in events {
        match arena[idx as usize].kind {
            EventKind::Negotiation(marker) => {
                state = state.on_marker(marker, opts);
            }
            _ => {
                let (retain, next) = state.on_event();
                state = next;
                if retain {
                    result.push(idx);
                }
            }
        }
    }

    result
}

/// Sanitize every circuit in the table.
pub fn sanitize_circuits(table: &mut CircuitTable, opts: &ExtractOptions) {
    table.transform(|circuit: &Circuit, arena| sanitize_events(&circuit.events, arena, opts));
}
