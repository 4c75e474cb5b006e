//! Output formatting for terminal display.
//!
//! Prints notebook-style `In [n]` / `Out [n]:` blocks and highlights the
//! traceback lines in captured output.

use std::time::Duration;

use pycell_core::{CellReport, ExecutionOutcome};

use crate::colors;

/// Whether `line` belongs to a Python traceback summary.
///
/// Matches the `Traceback (most recent call last):` banner and the final
/// `SomethingError: ...` / `Exception: ...` line.
pub fn is_error_line(line: &str) -> bool {
    let line = line.trim_end();
    if line.starts_with("Traceback (most recent call last):") {
        return true;
    }

    let Some((name, _)) = line.split_once(':') else {
        return false;
    };
    let name = name.rsplit('.').next().unwrap_or(name);
    let is_identifier = !name.is_empty()
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !name.starts_with(|c: char| c.is_ascii_digit());

    is_identifier && (name.ends_with("Error") || name == "Exception")
}

/// Color every traceback line of `text` red.
pub fn highlight(text: &str, on: bool) -> String {
    text.split_inclusive('\n')
        .map(|line| {
            if is_error_line(line) {
                let body = line.trim_end_matches('\n');
                let newline = &line[body.len()..];
                format!("{}{newline}", colors::paint(body, colors::RED, on))
            } else {
                line.to_string()
            }
        })
        .collect()
}

/// Print the `In [n] • <ms> ms` header.
pub fn print_input_header(execution_count: usize, elapsed: Duration, on: bool) {
    println!(
        "{} {}",
        colors::paint(&format!("In [{execution_count}]"), colors::CYAN, on),
        colors::paint(&format!("• {} ms", elapsed.as_millis()), colors::DIM, on),
    );
}

/// Print a cell report: header, then the `Out [n]:` block when there is output.
pub fn print_report(report: &CellReport, on: bool) {
    print_input_header(report.execution_count, report.elapsed, on);

    let text = report.output_text();
    if text.is_empty() {
        return;
    }

    let label_color = if report.outcome.is_error() {
        colors::RED
    } else {
        colors::GREEN
    };
    println!(
        "{}",
        colors::paint(&format!("Out [{}]:", report.execution_count), label_color, on)
    );
    print_text(&text, on);
}

/// Print the flattened text of a one-shot outcome.
pub fn print_outcome(outcome: ExecutionOutcome, on: bool) {
    print_text(&outcome.into_text(), on);
}

fn print_text(text: &str, on: bool) {
    let rendered = highlight(text, on);
    print!("{rendered}");
    if !rendered.is_empty() && !rendered.ends_with('\n') {
        println!();
    }
    colors::flush_stdout();
}
