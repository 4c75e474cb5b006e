//! Error types for pycell-core.
//!
//! Failures of the executed Python code are never errors at this level: they
//! are captured as text inside an [`ExecutionOutcome`](crate::ExecutionOutcome).
//! The variants below cover misuse of the host-side API.

use std::path::PathBuf;

use thiserror::Error;
use uuid::Uuid;

/// Result type for pycell-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in pycell-core.
#[derive(Debug, Error)]
pub enum Error {
    /// A session was passed to an executor that did not create it.
    #[error("session {session} belongs to a different executor")]
    ForeignSession { session: Uuid },

    /// Cell index outside the parsed notebook.
    #[error("cell not found: {index} (notebook has {count} cells)")]
    CellNotFound { index: usize, count: usize },

    /// A syntax status line that does not follow the `OK` / `ERR:l:c:msg` format.
    #[error("malformed syntax status: {0:?}")]
    MalformedStatus(String),

    /// Failed to read a notebook or script.
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Render the error together with a recovery hint for terminal output.
    pub fn with_hint(&self) -> String {
        let hint = match self {
            Error::ForeignSession { .. } => {
                "create the session with the same executor that runs it"
            }
            Error::CellNotFound { .. } => "cell indices start at 0; markdown cells are counted too",
            Error::MalformedStatus(_) => "expected \"OK\" or \"ERR:<line>:<column>:<message>\"",
            Error::Read { .. } => "check that the path exists and is readable",
        };
        format!("{self}\n  hint: {hint}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_is_appended() {
        let err = Error::CellNotFound { index: 7, count: 3 };
        let rendered = err.with_hint();
        assert!(rendered.starts_with("cell not found: 7 (notebook has 3 cells)"));
        assert!(rendered.contains("hint:"));
    }

    #[test]
    fn test_read_error_mentions_path() {
        let err = Error::Read {
            path: PathBuf::from("missing.py"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
        };
        assert!(err.to_string().contains("missing.py"));
    }
}
