// Engine module - the trace extraction and sanitization pipeline
// This layer sits between the raw event model (types) and CLI presentation

pub mod classify;
pub mod encode;
pub mod error;
pub mod extract;
pub mod parse;
pub mod sanitize;
pub mod select;
pub mod stats;
pub mod trace;

pub use encode::{WfFormat, WfLines};
pub use error::{Error, Result};
pub use extract::{ExtractOptions, extract_log_traces};
pub use select::{RUNNER_UP_WARN_EVENTS, RunnerUp, Selection, select_dominant};
pub use stats::{CellCounts, OverheadReport};
pub use trace::{TraceEvent, parse_trace_line, read_trace, write_trace};
