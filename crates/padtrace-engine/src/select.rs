//! Dominant-circuit selection.
//!
//! A browser visit drags helper circuits along (directory fetches,
//! preemptive circuits); the circuit with the most padding events is taken
//! as the one carrying the page load. Any other circuit that still has a
//! suspicious number of events is reported so the operator can inspect the
//! log, but never changes the outcome.

use padtrace_types::CircuitTable;

/// Runner-ups above this event count are worth a warning.
pub const RUNNER_UP_WARN_EVENTS: usize = 100;

/// A non-winning circuit big enough to flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerUp {
    pub circuit_id: String,
    pub events: usize,
}

/// Outcome of dominant-circuit selection.
#[derive(Debug, Clone)]
pub struct Selection {
    /// Index of the winning circuit in table order.
    pub dominant: usize,
    /// Oversized non-winners, advisory only.
    pub runner_ups: Vec<RunnerUp>,
}

/// Pick the circuit with the strictly greatest event count.
///
/// Ties break towards the first circuit encountered in table order: a later
/// circuit with an equal count never displaces the current leader. Returns
/// `None` only for an empty table.
pub fn select_dominant(table: &CircuitTable) -> Option<Selection> {
    let mut dominant: Option<(usize, usize)> = None;
    for (idx, circuit) in table.circuits().iter().enumerate() {
        let count = circuit.len();
        match dominant {
            Some((_, best)) if count <= best => {}
            _ => dominant = Some((idx, count)),
        }
    }

    let (dominant, _) = dominant?;
    let runner_ups = table
        .circuits()
        .iter()
        .enumerate()
        .filter(|&(idx, circuit)| idx != dominant && circuit.len() > RUNNER_UP_WARN_EVENTS)
        .map(|(_, circuit)| RunnerUp {
            circuit_id: circuit.id.clone(),
            events: circuit.len(),
        })
        .collect();

    Some(Selection {
        dominant,
        runner_ups,
    })
}
