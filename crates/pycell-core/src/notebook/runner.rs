//! Sequential notebook runner.
//!
//! Runs the code cells of a parsed notebook, in order, inside one session.
//! A failing cell does not stop the run; its traceback becomes its output.

use std::time::{Duration, Instant};

use serde::{Serialize, Serializer};

use crate::error::{Error, Result};
use crate::execute::{ExecutionOutcome, Executor, Session};

use super::parser::Cell;

/// Which cells to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellSelection {
    /// Every cell.
    All,
    /// A single cell.
    Only(usize),
    /// Every cell before the given one (exclusive).
    Above(usize),
    /// The given cell and everything after it.
    From(usize),
}

impl CellSelection {
    /// Resolve into a range of cell positions, validating the index.
    pub fn range(self, count: usize) -> Result<std::ops::Range<usize>> {
        let check = |index: usize| {
            if index < count {
                Ok(index)
            } else {
                Err(Error::CellNotFound { index, count })
            }
        };

        Ok(match self {
            CellSelection::All => 0..count,
            CellSelection::Only(index) => check(index)?..index + 1,
            CellSelection::Above(index) => 0..check(index)?,
            CellSelection::From(index) => check(index)?..count,
        })
    }
}

/// Result of running one code cell.
#[derive(Debug, Clone, Serialize)]
pub struct CellReport {
    /// Position of the cell in the notebook.
    pub cell_index: usize,

    /// Session execution number, the `n` in `In [n]`.
    pub execution_count: usize,

    /// What the cell did.
    pub outcome: ExecutionOutcome,

    /// Wall-clock time spent in the interpreter.
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl CellReport {
    /// Flattened output text, as `run_cell` would return it.
    pub fn output_text(&self) -> String {
        self.outcome.clone().into_text()
    }
}

fn serialize_millis<S: Serializer>(
    elapsed: &Duration,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_u64(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}

/// Callback trait for run progress reporting.
pub trait RunCallback {
    /// Called before a code cell starts executing.
    fn on_cell_started(&self, cell: &Cell, execution_count: usize);

    /// Called after a code cell finishes, successfully or not.
    fn on_cell_finished(&self, cell: &Cell, report: &CellReport);

    /// Called for markdown cells, which are never executed.
    fn on_cell_skipped(&self, _cell: &Cell) {}
}

/// Runs notebook cells against an executor.
pub struct NotebookRunner<'e> {
    /// Executor that owns the session.
    executor: &'e Executor,
    /// Progress reporting.
    callback: Option<Box<dyn RunCallback + 'e>>,
}

impl<'e> NotebookRunner<'e> {
    /// Create a runner over `executor`.
    pub fn new(executor: &'e Executor) -> Self {
        Self {
            executor,
            callback: None,
        }
    }

    /// Set the callback for progress reporting.
    pub fn set_callback(&mut self, callback: impl RunCallback + 'e) {
        self.callback = Some(Box::new(callback));
    }

    /// Run the selected cells of `cells` in `session`.
    ///
    /// Returns one report per executed code cell, in notebook order.
    pub fn run(
        &self,
        session: &mut Session,
        cells: &[Cell],
        selection: CellSelection,
    ) -> Result<Vec<CellReport>> {
        let range = selection.range(cells.len())?;
        let mut reports = Vec::new();

        for cell in &cells[range] {
            if !cell.is_code() {
                if let Some(ref callback) = self.callback {
                    callback.on_cell_skipped(cell);
                }
                continue;
            }

            if let Some(ref callback) = self.callback {
                callback.on_cell_started(cell, session.execution_count() + 1);
            }

            let start = Instant::now();
            let outcome = self.executor.execute_cell(session, &cell.source)?;
            let report = CellReport {
                cell_index: cell.index,
                execution_count: session.execution_count(),
                outcome,
                elapsed: start.elapsed(),
            };

            if let Some(ref callback) = self.callback {
                callback.on_cell_finished(cell, &report);
            }
            reports.push(report);
        }

        Ok(reports)
    }
}
