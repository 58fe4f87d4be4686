// NOTE: padtrace Architecture Rationale
//
// Why per-file pipelines (not one shared pass)?
// - Every log file is an independent page-load measurement; nothing useful
//   crosses file boundaries
// - All mutable state (timestamp base, circuit table, sanitizer skip state)
//   is local to one file and discarded afterwards, so batches parallelize
//   with no locking
//
// Why fail-fast per file (no retries)?
// - The pipeline is a deterministic transform; a failure means a corrupt
//   log or a misconfiguration, both of which need a human
// - Preconditions (directories exist, no output collisions) are verified
//   before any file is touched, so an aborted run leaves no partial mess
//   behind it

mod args;
mod commands;
mod handlers;

pub use args::{Cli, Commands, WfFormatArg};
pub use commands::run;
