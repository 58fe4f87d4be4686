use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use std::fs;
use std::path::Path;

use padtrace_engine::{CellCounts, OverheadReport, read_trace};

use super::list_files;

/// Aggregate bandwidth overhead over a folder of trace files.
pub fn handle(input: &Path, output: Option<&Path>) -> Result<()> {
    if let Some(path) = output {
        if path.exists() {
            bail!("output file {} already exists", path.display());
        }
    }

    let files = list_files(input)?;

    let counts: Vec<CellCounts> = files
        .par_iter()
        .map(|(path, name)| {
            let trace = read_trace(path)
                .with_context(|| format!("failed to read trace {}", path.display()))?;
            let counts = CellCounts::of(&trace);
            counts.ensure_nonpadding(name)?;
            Ok(counts)
        })
        .collect::<Result<_>>()?;

    let Some(report) = OverheadReport::from_counts(&counts) else {
        bail!("no trace files in {}", input.display());
    };

    match output {
        Some(path) => {
            let json = serde_json::to_string_pretty(&report)?;
            fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        None => println!("{}", report),
    }

    Ok(())
}
