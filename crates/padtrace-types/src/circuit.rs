//! Circuit table backed by an arena of immutable event records.
//!
//! Circuits do not own their events; they hold indices into a shared arena
//! built once per log file. Classification and sanitization are then plain
//! read/transform passes over index lists, with no nested mutable containers
//! to alias.

use std::collections::HashMap;

use crate::event::EventRecord;

/// A logical traffic path, proxy for one page load.
///
/// `events` are indices into the owning [`CircuitTable`]'s arena, in
/// log-arrival order. They are never re-sorted.
#[derive(Debug, Clone)]
pub struct Circuit {
    pub id: String,
    pub events: Vec<u32>,
}

impl Circuit {
    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// All circuits of one log file.
///
/// Iteration order over [`circuits`](Self::circuits) is first-encounter
/// order, which is what the dominant-circuit tie-break observes.
#[derive(Debug, Clone, Default)]
pub struct CircuitTable {
    arena: Vec<EventRecord>,
    circuits: Vec<Circuit>,
    index: HashMap<String, usize>,
}

impl CircuitTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the arena and to its circuit, creating the circuit
    /// on first encounter.
    pub fn push(&mut self, record: EventRecord) {
        let event_idx = self.arena.len() as u32;
        let circuit_idx = match self.index.get(&record.circuit_id) {
            Some(&idx) => idx,
            None => {
                let idx = self.circuits.len();
                self.index.insert(record.circuit_id.clone(), idx);
                self.circuits.push(Circuit {
                    id: record.circuit_id.clone(),
                    events: Vec::new(),
                });
                idx
            }
        };
        self.circuits[circuit_idx].events.push(event_idx);
        self.arena.push(record);
    }

    pub fn arena(&self) -> &[EventRecord] {
        &self.arena
    }

    pub fn circuits(&self) -> &[Circuit] {
        &self.circuits
    }

    pub fn get(&self, circuit_id: &str) -> Option<&Circuit> {
        self.index.get(circuit_id).map(|&idx| &self.circuits[idx])
    }

    /// Number of circuits.
    pub fn len(&self) -> usize {
        self.circuits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.circuits.is_empty()
    }

    /// Iterate a circuit's records in arrival order.
    pub fn events<'a>(&'a self, circuit: &'a Circuit) -> impl Iterator<Item = &'a EventRecord> {
        circuit.events.iter().map(|&idx| &self.arena[idx as usize])
    }

    /// Drop circuits failing the predicate; surviving circuits keep their
    /// relative order. The arena is left untouched.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Circuit, &[EventRecord]) -> bool,
    {
        let circuits = std::mem::take(&mut self.circuits);
        self.circuits = circuits
            .into_iter()
            .filter(|c| keep(c, &self.arena))
            .collect();
        self.index = self
            .circuits
            .iter()
            .enumerate()
            .map(|(idx, c)| (c.id.clone(), idx))
            .collect();
    }

    /// Replace each circuit's event list with the transform's output.
    pub fn transform<F>(&mut self, mut f: F)
    where
        F: FnMut(&Circuit, &[EventRecord]) -> Vec<u32>,
    {
        let mut circuits = std::mem::take(&mut self.circuits);
        for circuit in &mut circuits {
            circuit.events = f(circuit, &self.arena);
        }
        self.circuits = circuits;
    }
}
