//! Parser for percent-format notebooks.
//!
//! A notebook is a plain Python file split into cells by marker lines:
//!
//! ```text
//! import math          <- leading code cell (no marker needed)
//! # %% [markdown]
//! # Some *notes*
//! # %%
//! print(math.pi)
//! ```

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::error::{Error, Result};

/// Prefix (after leading whitespace) that starts a new cell.
pub const CELL_MARKER: &str = "# %%";

/// Type of cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellKind {
    /// Executable Python.
    Code,
    /// Commented-out markdown text, never executed.
    Markdown,
}

/// A cell extracted from a notebook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Cell {
    /// Position in the notebook (0-based, markdown cells included).
    pub index: usize,

    /// Cell type.
    pub kind: CellKind,

    /// First line of the body (0-based, marker excluded).
    pub start_line: usize,

    /// Last line of the body (0-based, inclusive).
    pub end_line: usize,

    /// Body text, lines joined with `\n`.
    pub source: String,
}

impl Cell {
    pub fn is_code(&self) -> bool {
        self.kind == CellKind::Code
    }

    /// Whether `line` (0-based) falls inside this cell's body.
    pub fn contains_line(&self, line: usize) -> bool {
        (self.start_line..=self.end_line).contains(&line)
    }

    /// Body with one leading `#` and one following space removed from each line.
    pub fn markdown_text(&self) -> String {
        self.source
            .lines()
            .map(|line| {
                let line = line.trim_start();
                let line = line.strip_prefix('#').unwrap_or(line);
                line.strip_prefix(' ').unwrap_or(line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Whether a line opens a new cell.
pub fn is_marker(line: &str) -> bool {
    line.trim_start().starts_with(CELL_MARKER)
}

fn marker_kind(line: &str) -> CellKind {
    let lower = line.to_lowercase();
    if lower.contains("markdown") || lower.contains(" md") {
        CellKind::Markdown
    } else {
        CellKind::Code
    }
}

/// Split notebook source into cells.
pub fn parse_cells(source: &str) -> Vec<Cell> {
    let lines: Vec<&str> = source.lines().collect();
    let mut cells = Vec::new();
    let mut start = 0;
    let mut kind = CellKind::Code;

    let push = |cells: &mut Vec<Cell>, kind: CellKind, start: usize, end: usize| {
        cells.push(Cell {
            index: cells.len(),
            kind,
            start_line: start,
            end_line: end,
            source: lines[start..=end].join("\n"),
        });
    };

    for (i, line) in lines.iter().enumerate() {
        if !is_marker(line) {
            continue;
        }
        if i > start {
            push(&mut cells, kind, start, i - 1);
        }
        start = i + 1;
        kind = marker_kind(line);
    }

    if start < lines.len() {
        push(&mut cells, kind, start, lines.len() - 1);
    }

    cells
}

/// Read and split a notebook file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Cell>> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_cells(&source))
}

/// Index of the cell containing `line` (0-based), if any.
pub fn cell_at_line(cells: &[Cell], line: usize) -> Option<usize> {
    cells.iter().position(|cell| cell.contains_line(line))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_is_one_code_cell() {
        let cells = parse_cells("a = 1\nprint(a)\n");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].kind, CellKind::Code);
        assert_eq!(cells[0].source, "a = 1\nprint(a)");
        assert_eq!((cells[0].start_line, cells[0].end_line), (0, 1));
    }

    #[test]
    fn test_leading_cell_and_markers() {
        let source = "import math\n# %%\nx = 2\n# %% [markdown]\n# Title\n#\n# body\n# %%\nprint(x)";
        let cells = parse_cells(source);

        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0].source, "import math");
        assert_eq!(cells[1].source, "x = 2");
        assert_eq!(cells[2].kind, CellKind::Markdown);
        assert_eq!(cells[2].markdown_text(), "Title\n\nbody");
        assert_eq!(cells[3].source, "print(x)");
        assert_eq!(cells[3].index, 3);
    }

    #[test]
    fn test_empty_cells_are_dropped() {
        let cells = parse_cells("# %%\n# %%\nvalue = 1\n# %%");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].source, "value = 1");
        assert_eq!(cells[0].start_line, 2);
    }

    #[test]
    fn test_indented_marker_and_md_shorthand() {
        let cells = parse_cells("  # %% md\n# note\n");
        assert_eq!(cells.len(), 1);
        assert_eq!(cells[0].kind, CellKind::Markdown);
    }

    #[test]
    fn test_cell_at_line() {
        let cells = parse_cells("a = 1\n# %%\nb = 2\nc = 3");
        assert_eq!(cell_at_line(&cells, 0), Some(0));
        assert_eq!(cell_at_line(&cells, 1), None); // the marker itself
        assert_eq!(cell_at_line(&cells, 3), Some(1));
        assert_eq!(cell_at_line(&cells, 9), None);
    }

    #[test]
    fn test_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nb.py");
        std::fs::write(&path, "# %%\nprint(1)\n").unwrap();

        let cells = parse_file(&path).unwrap();
        assert_eq!(cells.len(), 1);

        let missing = parse_file(dir.path().join("missing.py"));
        assert!(matches!(missing, Err(Error::Read { .. })));
    }
}
