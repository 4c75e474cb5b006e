//! Terminal color constants and utilities for CLI output.

use std::io::{self, IsTerminal, Write};

pub const RESET: &str = "\x1b[0m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";
pub const RED: &str = "\x1b[31m";

/// Whether stdout is a terminal that should receive escape codes.
pub fn enabled() -> bool {
    io::stdout().is_terminal()
}

/// Wrap `text` in `color` when coloring is on.
pub fn paint(text: &str, color: &str, on: bool) -> String {
    if on {
        format!("{color}{text}{RESET}")
    } else {
        text.to_string()
    }
}

/// Flush stdout to ensure progress output is visible immediately.
///
/// This is useful when printing progress indicators without a trailing newline.
#[inline]
pub fn flush_stdout() {
    io::stdout().flush().ok();
}
