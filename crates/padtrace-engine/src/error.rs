use std::fmt;

/// Result type for padtrace-engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur in the engine layer
#[derive(Debug)]
pub enum Error {
    /// IO operation failed
    Io(std::io::Error),

    /// A line matched the trace marker but a required sub-field is missing
    /// or unparsable. Signals log corruption, fatal for the file.
    Format(String),

    /// No usable circuits or cells remain after filtering. Fatal for the
    /// file; the caller decides whether to skip it or abort the run.
    EmptyTrace(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(err) => write!(f, "IO error: {}", err),
            Error::Format(msg) => write!(f, "invalid trace format: {}", msg),
            Error::EmptyTrace(msg) => write!(f, "empty trace: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Format(_) | Error::EmptyTrace(_) => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
