//! Structured result of a single execution.

use serde::Serialize;

/// Location and text of a syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyntaxDiagnostic {
    /// Line number (1-indexed, defaults to 1).
    pub line: usize,

    /// Column number (1-indexed, defaults to 1).
    pub column: usize,

    /// Error message as reported by the compiler.
    pub message: String,

    /// Rendered `SyntaxError` report, as a traceback printer would show it.
    pub trace: String,
}

/// What happened when a piece of source text was executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExecutionOutcome {
    /// Ran to completion.
    Success { stdout: String, stderr: String },

    /// Rejected by the compiler; nothing was executed.
    CompileError(SyntaxDiagnostic),

    /// Raised an exception. Output written before the failure is kept.
    RuntimeError {
        stdout: String,
        stderr: String,
        trace: String,
    },
}

impl ExecutionOutcome {
    /// Outcome for blank input, which is never compiled.
    pub fn empty() -> Self {
        Self::Success {
            stdout: String::new(),
            stderr: String::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        !self.is_success()
    }

    /// Text the program wrote to stdout (empty for compile errors).
    pub fn stdout(&self) -> &str {
        match self {
            Self::Success { stdout, .. } | Self::RuntimeError { stdout, .. } => stdout,
            Self::CompileError(_) => "",
        }
    }

    /// Flatten into the single string handed back to callers.
    ///
    /// Compile errors return the diagnostic alone. Otherwise stdout comes
    /// first, then stderr, then the traceback of a runtime error.
    pub fn into_text(self) -> String {
        match self {
            Self::Success { mut stdout, stderr } => {
                stdout.push_str(&stderr);
                stdout
            }
            Self::CompileError(diagnostic) => diagnostic.trace,
            Self::RuntimeError {
                mut stdout,
                stderr,
                trace,
            } => {
                stdout.push_str(&stderr);
                stdout.push_str(&trace);
                stdout
            }
        }
    }
}
