pub mod extract;
pub mod overhead;
pub mod wf;

use anyhow::{Result, bail};
use std::fs;
use std::path::{Path, PathBuf};

/// One input file and where its output goes.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub name: String,
}

/// List the regular files of a directory in name order.
pub fn list_files(input_dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    if !input_dir.is_dir() {
        bail!("{} is not a directory", input_dir.display());
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push((entry.path(), name));
    }
    files.sort_by(|a, b| a.1.cmp(&b.1));
    Ok(files)
}

/// Plan a directory-to-directory batch run.
///
/// All preconditions are checked up front, before any file is processed:
/// both paths must be existing directories and no planned output file may
/// already exist (outputs are never silently overwritten).
pub fn plan_batch(
    input_dir: &Path,
    output_dir: &Path,
    output_name: impl Fn(&str) -> String,
) -> Result<Vec<BatchJob>> {
    if !output_dir.is_dir() {
        bail!("{} is not a directory", output_dir.display());
    }

    let jobs: Vec<BatchJob> = list_files(input_dir)?
        .into_iter()
        .map(|(input, name)| BatchJob {
            input,
            output: output_dir.join(output_name(&name)),
            name,
        })
        .collect();

    for job in &jobs {
        if job.output.exists() {
            bail!("output file {} already exists", job.output.display());
        }
    }

    Ok(jobs)
}
