//! `cells` command implementation.
//!
//! Runs a percent-format notebook in one session, printing each cell as it
//! finishes, then optionally exports the notebook with its outputs.

use std::path::PathBuf;
use std::process::ExitCode;

use pycell_core::notebook::{ExportFormat, export, parse_cells};
use pycell_core::{
    Cell, CellReport, CellSelection, Executor, ExecutorConfig, NotebookRunner, RunCallback,
};

use crate::colors;
use crate::output::print_report;
use crate::source;

/// Options for the `cells` command.
pub struct CellsOptions {
    pub selection: CellSelection,
    pub json: bool,
    pub export: Option<ExportFormat>,
    pub output: Option<PathBuf>,
}

/// Map the mutually exclusive selection flags onto a [`CellSelection`].
pub fn selection(cell: Option<usize>, above: Option<usize>, from: Option<usize>) -> CellSelection {
    match (cell, above, from) {
        (Some(index), _, _) => CellSelection::Only(index),
        (None, Some(index), _) => CellSelection::Above(index),
        (None, None, Some(index)) => CellSelection::From(index),
        (None, None, None) => CellSelection::All,
    }
}

/// Prints each report as soon as its cell finishes.
struct TerminalProgress {
    color: bool,
}

impl RunCallback for TerminalProgress {
    fn on_cell_started(&self, cell: &Cell, execution_count: usize) {
        tracing::debug!(cell = cell.index, execution_count, "cell started");
    }

    fn on_cell_finished(&self, _cell: &Cell, report: &CellReport) {
        print_report(report, self.color);
        println!();
    }

    fn on_cell_skipped(&self, cell: &Cell) {
        tracing::debug!(cell = cell.index, "skipping markdown cell");
    }
}

/// Run a notebook.
pub fn execute(
    notebook: &str,
    config: ExecutorConfig,
    options: &CellsOptions,
) -> anyhow::Result<ExitCode> {
    let text = source::load(notebook)?;
    let cells = parse_cells(&text);
    let color = colors::enabled();

    if cells.iter().all(|cell| !cell.is_code()) {
        let message = format!("No code cells found in {}.", source::display_name(notebook));
        println!("{}", colors::paint(&message, colors::YELLOW, color));
        println!("Cells are separated by lines starting with `# %%`");
        return Ok(ExitCode::SUCCESS);
    }

    let executor = Executor::with_config(config);
    let mut session = executor.new_session();
    let mut runner = NotebookRunner::new(&executor);

    // JSON and export to stdout own stdout; progress goes nowhere then.
    let exporting_to_stdout = options.export.is_some() && options.output.is_none();
    if !options.json && !exporting_to_stdout {
        runner.set_callback(TerminalProgress { color });
    }

    let reports = runner.run(&mut session, &cells, options.selection)?;
    let failed = reports.iter().filter(|report| report.outcome.is_error()).count();

    if options.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    }

    if let Some(format) = options.export {
        let exported = export(&cells, &reports, format);
        match &options.output {
            Some(path) => {
                std::fs::write(path, exported)?;
                if !options.json {
                    println!(
                        "{} {} cells to {}",
                        colors::paint("Exported", colors::GREEN, color),
                        cells.len(),
                        path.display()
                    );
                }
            }
            None if !options.json => print!("{exported}"),
            None => {}
        }
    }

    if !options.json && !exporting_to_stdout {
        let summary = format!("Ran {} cells, {} failed", reports.len(), failed);
        let summary_color = if failed == 0 { colors::GREEN } else { colors::RED };
        println!("{}", colors::paint(&summary, summary_color, color));
    }

    Ok(if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
