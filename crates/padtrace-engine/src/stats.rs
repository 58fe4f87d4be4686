//! Bandwidth-overhead statistics over a set of trace files.
//!
//! Overhead is counted in cells: a trace that sends 120 cells of which 100
//! are nonpadding has a send overhead factor of 1.2.

use serde::Serialize;
use std::fmt;

use padtrace_types::EventKind;

use crate::error::{Error, Result};
use crate::trace::TraceEvent;

/// Cell counts of one trace.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellCounts {
    pub sent_nonpadding: usize,
    pub recv_nonpadding: usize,
    pub sent_padding: usize,
    pub recv_padding: usize,
}

impl CellCounts {
    pub fn of(trace: &[TraceEvent]) -> CellCounts {
        let mut counts = CellCounts::default();
        for event in trace {
            match event.kind {
                EventKind::NonpaddingSent => counts.sent_nonpadding += 1,
                EventKind::NonpaddingReceived => counts.recv_nonpadding += 1,
                EventKind::PaddingSent => counts.sent_padding += 1,
                EventKind::PaddingReceived => counts.recv_padding += 1,
                _ => {}
            }
        }
        counts
    }

    pub fn total_sent(&self) -> usize {
        self.sent_nonpadding + self.sent_padding
    }

    pub fn total_recv(&self) -> usize {
        self.recv_nonpadding + self.recv_padding
    }

    /// A trace that never sent or never received a nonpadding cell cannot
    /// represent a page load; refuse to compute overhead from it.
    pub fn ensure_nonpadding(&self, name: &str) -> Result<()> {
        if self.sent_nonpadding == 0 {
            return Err(Error::EmptyTrace(format!(
                "{} sent 0 nonpadding cells, broken trace?",
                name
            )));
        }
        if self.recv_nonpadding == 0 {
            return Err(Error::EmptyTrace(format!(
                "{} recv 0 nonpadding cells, broken trace?",
                name
            )));
        }
        Ok(())
    }
}

/// Aggregate overhead over many traces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverheadReport {
    pub traces: usize,
    pub total_cells: usize,
    pub total_sent: usize,
    pub total_recv: usize,
    /// Mean of per-trace `total_sent / sent_nonpadding`.
    pub avg_send_overhead: f64,
    /// Mean of per-trace `total_recv / recv_nonpadding`.
    pub avg_recv_overhead: f64,
}

impl OverheadReport {
    /// Aggregate per-trace counts; counts must have passed
    /// [`CellCounts::ensure_nonpadding`].
    pub fn from_counts(counts: &[CellCounts]) -> Option<OverheadReport> {
        if counts.is_empty() {
            return None;
        }

        let total_sent: usize = counts.iter().map(|c| c.total_sent()).sum();
        let total_recv: usize = counts.iter().map(|c| c.total_recv()).sum();
        let send_sum: f64 = counts
            .iter()
            .map(|c| c.total_sent() as f64 / c.sent_nonpadding as f64)
            .sum();
        let recv_sum: f64 = counts
            .iter()
            .map(|c| c.total_recv() as f64 / c.recv_nonpadding as f64)
            .sum();

        Some(OverheadReport {
            traces: counts.len(),
            total_cells: total_sent + total_recv,
            total_sent,
            total_recv,
            avg_send_overhead: send_sum / counts.len() as f64,
            avg_recv_overhead: recv_sum / counts.len() as f64,
        })
    }
}

impl fmt::Display for OverheadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "for {} traces, {} cells in total, {} sent and {} recv",
            self.traces, self.total_cells, self.total_sent, self.total_recv
        )?;
        writeln!(
            f,
            "\t- average send bandwidth overhead:\t{:.2}",
            self.avg_send_overhead
        )?;
        write!(
            f,
            "\t- average recv bandwidth overhead:\t{:.2}",
            self.avg_recv_overhead
        )
    }
}
