use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use padtrace_engine::{WfFormat, read_trace};

use super::{BatchJob, plan_batch};

/// Re-encode every trace file in `input` into `format` under `output`.
pub fn handle(
    input: &Path,
    output: &Path,
    format: WfFormat,
    extension: Option<&str>,
) -> Result<()> {
    let extension = extension.unwrap_or_else(|| format.extension());
    let jobs = plan_batch(input, output, |name| format!("{name}.{extension}"))?;

    jobs.par_iter().try_for_each(|job| process(job, format))
}

fn process(job: &BatchJob, format: WfFormat) -> Result<()> {
    let trace = read_trace(&job.input)
        .with_context(|| format!("failed to read trace {}", job.input.display()))?;

    let mut out = String::new();
    for line in format.encode(&trace) {
        out.push_str(&line);
        out.push('\n');
    }

    fs::write(&job.output, out)
        .with_context(|| format!("failed to write {}", job.output.display()))
}
