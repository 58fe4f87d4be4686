//! Circuit-level filters applied before sanitization.
//!
//! Two independent predicates over a circuit's stream-open destinations:
//! an address blacklist, and a filter for circuits that never resolved a
//! domain name. Both see the full table; their relative order does not
//! matter.

use std::net::{Ipv4Addr, Ipv6Addr};

use padtrace_types::{Circuit, CircuitTable, EventKind, EventRecord};

use crate::error::{Error, Result};
use crate::extract::ExtractOptions;

/// Drop blacklisted and (unless allowed) IP-only circuits.
pub fn apply_filters(table: &mut CircuitTable, opts: &ExtractOptions) -> Result<()> {
    // Address extraction can fail on corrupt stream-open events, so decide
    // per circuit before mutating the table.
    let mut keep = Vec::with_capacity(table.len());
    for circuit in table.circuits() {
        let addresses = stream_addresses(circuit, table.arena())?;

        let blacklisted = addresses
            .iter()
            .any(|addr| opts.blacklist.iter().any(|b| b == addr));
        let ip_only =
            !opts.allow_ips && !addresses.is_empty() && addresses.iter().all(|a| is_ip_literal(a));

        keep.push(!blacklisted && !ip_only);
    }

    let mut decisions = keep.into_iter();
    table.retain(|_, _| decisions.next().unwrap_or(false));
    Ok(())
}

/// Destination addresses of every stream-open event in the circuit.
///
/// A stream-open without an address argument means the log is corrupt.
fn stream_addresses<'a>(circuit: &Circuit, arena: &'a [EventRecord]) -> Result<Vec<&'a str>> {
    let mut addresses = Vec::new();
    for &idx in &circuit.events {
        let record = &arena[idx as usize];
        if record.kind != EventKind::StreamOpen {
            continue;
        }
        match record.stream_address() {
            Some(addr) => addresses.push(addr),
            None => {
                return Err(Error::Format(format!(
                    "stream-open event without address on circuit {}",
                    circuit.id
                )));
            }
        }
    }
    Ok(addresses)
}

/// Syntactic IPv4/IPv6 literal check; anything with a port or a name fails.
fn is_ip_literal(addr: &str) -> bool {
    addr.parse::<Ipv4Addr>().is_ok() || addr.parse::<Ipv6Addr>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use padtrace_types::EventRecord;

    fn table(circuits: &[(&str, &[&str])]) -> CircuitTable {
        let mut table = CircuitTable::new();
        for (cid, events) in circuits {
            for (t, event) in events.iter().enumerate() {
                table.push(EventRecord::new(*cid, t as i64, *event));
            }
        }
        table
    }

    #[test]
    fn blacklisted_address_drops_circuit() {
        let circuits: &[(&str, &[&str])] = &[
            (
                "1",
                &[
                    "connection_ap_handshake_send_begin aus1.torproject.org",
                    "circpad_cell_event_nonpadding_sent",
                    "circpad_cell_event_nonpadding_received",
                ],
            ),
            ("2", &["connection_ap_handshake_send_begin example.com"]),
        ];
        let mut t = table(circuits);
        apply_filters(&mut t, &ExtractOptions::default()).unwrap();
        assert!(t.get("1").is_none());
        assert!(t.get("2").is_some());
    }

    #[test]
    fn blacklist_match_is_exact() {
        let mut t = table(&[(
            "1",
            &["connection_ap_handshake_send_begin aus1.torproject.org.evil.com"],
        )]);
        apply_filters(&mut t, &ExtractOptions::default()).unwrap();
        assert!(t.get("1").is_some());
    }

    #[test]
    fn ip_only_circuit_is_dropped_unless_allowed() {
        let circuits: &[(&str, &[&str])] = &[
            ("1", &["connection_ap_handshake_send_begin 1.2.3.4"]),
            ("2", &["connection_ap_handshake_send_begin ::1"]),
            (
                "3",
                &[
                    "connection_ap_handshake_send_begin 1.2.3.4",
                    "connection_ap_handshake_send_begin example.com",
                ],
            ),
        ];

        let mut t = table(circuits);
        apply_filters(&mut t, &ExtractOptions::default()).unwrap();
        assert!(t.get("1").is_none());
        assert!(t.get("2").is_none());
        // A single resolved domain keeps the circuit.
        assert!(t.get("3").is_some());

        let mut t = table(circuits);
        let opts = ExtractOptions {
            allow_ips: true,
            ..ExtractOptions::default()
        };
        apply_filters(&mut t, &opts).unwrap();
        assert_eq!(t.len(), 3);
    }

    #[test]
    fn circuit_without_stream_opens_survives() {
        let mut t = table(&[("1", &["circpad_cell_event_nonpadding_sent"])]);
        apply_filters(&mut t, &ExtractOptions::default()).unwrap();
        assert!(t.get("1").is_some());
    }

    #[test]
    fn corrupt_stream_open_is_fatal() {
        let mut t = table(&[("1", &["connection_ap_handshake_send_begin"])]);
        let err = apply_filters(&mut t, &ExtractOptions::default()).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }
}
