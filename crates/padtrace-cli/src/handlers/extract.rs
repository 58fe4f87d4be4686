use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use padtrace_engine::{
    ExtractOptions, extract_log_traces, select_dominant, write_trace,
};

use super::{BatchJob, plan_batch};

/// Transform every tor log in `input` into a trace file in `output`.
///
/// Files are independent, so they run through the pipeline on a worker
/// pool; the first failure aborts the run.
pub fn handle(input: &Path, output: &Path, opts: &ExtractOptions) -> Result<()> {
    let jobs = plan_batch(input, output, |name| name.to_string())?;

    jobs.par_iter().try_for_each(|job| process(job, opts))
}

fn process(job: &BatchJob, opts: &ExtractOptions) -> Result<()> {
    let log = fs::read_to_string(&job.input)
        .with_context(|| format!("failed to read {}", job.input.display()))?;

    let table = extract_log_traces(log.lines(), opts)
        .with_context(|| format!("no usable trace in {}", job.input.display()))?;

    let selection = select_dominant(&table)
        .with_context(|| format!("no circuits left in {}", job.input.display()))?;
    let winner = &table.circuits()[selection.dominant];

    write_trace(&job.output, &table, winner)
        .with_context(|| format!("failed to write {}", job.output.display()))?;

    for runner_up in &selection.runner_ups {
        eprintln!(
            "Warning: found extra circuit with {} events in {}",
            runner_up.events,
            job.input.display()
        );
    }

    Ok(())
}
