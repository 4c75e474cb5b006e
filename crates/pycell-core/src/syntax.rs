//! Syntax check status and its one-line wire format.
//!
//! ```text
//! OK
//! ERR:<line>:<column>:<message>
//! ```
//!
//! The message never contains a line break, so a status always fits on one
//! line of a line-oriented channel.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::execute::SyntaxDiagnostic;

/// Result of a syntax-only check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxStatus {
    /// The source compiles.
    Valid,
    /// The source does not compile.
    Invalid {
        line: usize,
        column: usize,
        message: String,
    },
}

impl SyntaxStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, SyntaxStatus::Valid)
    }
}

impl From<SyntaxDiagnostic> for SyntaxStatus {
    fn from(diagnostic: SyntaxDiagnostic) -> Self {
        SyntaxStatus::Invalid {
            line: diagnostic.line.max(1),
            column: diagnostic.column.max(1),
            message: sanitize_message(&diagnostic.message),
        }
    }
}

impl fmt::Display for SyntaxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxStatus::Valid => f.write_str("OK"),
            SyntaxStatus::Invalid {
                line,
                column,
                message,
            } => write!(f, "ERR:{line}:{column}:{message}"),
        }
    }
}

impl FromStr for SyntaxStatus {
    type Err = Error;

    /// Parse a status line. Unparsable line/column numbers fall back to 1.
    fn from_str(s: &str) -> Result<Self, Error> {
        let s = s.trim_end_matches(['\r', '\n']);
        if s == "OK" {
            return Ok(SyntaxStatus::Valid);
        }

        let parts: Vec<&str> = s.splitn(4, ':').collect();
        match parts.as_slice() {
            ["ERR", line, column, message] => Ok(SyntaxStatus::Invalid {
                line: line.trim().parse().unwrap_or(1),
                column: column.trim().parse().unwrap_or(1),
                message: (*message).to_string(),
            }),
            _ => Err(Error::MalformedStatus(s.to_string())),
        }
    }
}

/// Collapse a compiler message onto one line.
///
/// Every `\n` and `\r` becomes a single space, then surrounding whitespace is trimmed.
pub fn sanitize_message(message: &str) -> String {
    message.replace(['\n', '\r'], " ").trim().to_string()
}
