//! Percent-format notebooks: parsing, running, exporting.

mod export;
mod parser;
mod runner;

pub use export::{export, to_markdown, to_percent_script, ExportFormat};
pub use parser::{cell_at_line, is_marker, parse_cells, parse_file, Cell, CellKind, CELL_MARKER};
pub use runner::{CellReport, CellSelection, NotebookRunner, RunCallback};
