//! Export a notebook, with the outputs of its last run, as text.

use std::collections::HashMap;

use super::parser::{Cell, CellKind};
use super::runner::CellReport;

/// Output format for [`export`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Percent-format Python script with outputs as `# Out:` comments.
    Percent,
    /// Markdown document with fenced code and output blocks.
    Markdown,
}

/// Render `cells` in the given format, attaching outputs from `reports`.
///
/// When a cell ran more than once, the last report wins.
pub fn export(cells: &[Cell], reports: &[CellReport], format: ExportFormat) -> String {
    let outputs: HashMap<usize, String> = reports
        .iter()
        .map(|report| (report.cell_index, report.output_text()))
        .collect();

    match format {
        ExportFormat::Percent => to_percent_script(cells, &outputs),
        ExportFormat::Markdown => to_markdown(cells, &outputs),
    }
}

/// Percent-format script.
pub fn to_percent_script(cells: &[Cell], outputs: &HashMap<usize, String>) -> String {
    let mut out = String::new();

    for cell in cells {
        match cell.kind {
            CellKind::Markdown => {
                out.push_str("# %% [markdown]\n");
                for line in cell.markdown_text().lines() {
                    push_comment(&mut out, line);
                }
            }
            CellKind::Code => {
                out.push_str("# %%\n");
                out.push_str(cell.source.trim_end());
                out.push('\n');
                if let Some(output) = non_blank(outputs.get(&cell.index)) {
                    out.push_str("# Out:\n");
                    for line in output.lines() {
                        push_comment(&mut out, line);
                    }
                }
            }
        }
        out.push('\n');
    }

    out
}

/// Markdown document.
pub fn to_markdown(cells: &[Cell], outputs: &HashMap<usize, String>) -> String {
    let mut out = String::new();

    for cell in cells {
        match cell.kind {
            CellKind::Markdown => {
                out.push_str(cell.markdown_text().trim());
                out.push_str("\n\n");
            }
            CellKind::Code => {
                if !cell.source.trim().is_empty() {
                    out.push_str("```python\n");
                    out.push_str(cell.source.trim_end());
                    out.push_str("\n```\n\n");
                }
                if let Some(output) = non_blank(outputs.get(&cell.index)) {
                    out.push_str("```text\n");
                    out.push_str(output.trim_end());
                    out.push_str("\n```\n\n");
                }
            }
        }
    }

    out
}

fn push_comment(out: &mut String, line: &str) {
    if line.is_empty() {
        out.push_str("#\n");
    } else {
        out.push_str("# ");
        out.push_str(line);
        out.push('\n');
    }
}

fn non_blank(output: Option<&String>) -> Option<&String> {
    output.filter(|text| !text.trim().is_empty())
}
