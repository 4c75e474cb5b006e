//! Integration tests for explicit sessions and the notebook runner.

use std::cell::RefCell;

use pycell_core::notebook::{export, parse_cells, ExportFormat};
use pycell_core::{
    Cell, CellReport, CellSelection, Error, Executor, ExecutorConfig, NotebookRunner, RunCallback,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn executor() -> Executor {
    Executor::with_config(ExecutorConfig::minimal())
}

fn sample_notebook() -> &'static str {
    r#"base = 21
# %% [markdown]
# Doubling
# %%
doubled = base * 2
print(doubled)
# %%
print(missing)
# %%
print(doubled + 1)
"#
}

/// Records callback invocations as strings.
#[derive(Default)]
struct RecordingCallback {
    events: RefCell<Vec<String>>,
}

impl RunCallback for &RecordingCallback {
    fn on_cell_started(&self, cell: &Cell, execution_count: usize) {
        self.events
            .borrow_mut()
            .push(format!("start {} [{}]", cell.index, execution_count));
    }

    fn on_cell_finished(&self, cell: &Cell, report: &CellReport) {
        let status = if report.outcome.is_success() { "ok" } else { "err" };
        self.events
            .borrow_mut()
            .push(format!("finish {} {}", cell.index, status));
    }

    fn on_cell_skipped(&self, cell: &Cell) {
        self.events.borrow_mut().push(format!("skip {}", cell.index));
    }
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn test_sessions_are_independent() {
    let executor = executor();
    let mut first = executor.new_session();
    let mut second = executor.new_session();

    executor.execute_cell(&mut first, "value = 'first'").unwrap();
    let outcome = executor.execute_cell(&mut second, "print(value)").unwrap();
    assert!(outcome.into_text().contains("NameError"));

    let outcome = executor.execute_cell(&mut first, "print(value)").unwrap();
    assert_eq!(outcome.into_text(), "first\n");
}

#[test]
fn test_execution_count_and_reset() {
    let executor = executor();
    let mut session = executor.new_session();
    let original_id = session.id();

    executor.execute_cell(&mut session, "x = 1").unwrap();
    executor.execute_cell(&mut session, "   ").unwrap();
    executor.execute_cell(&mut session, "x = (").unwrap();
    assert_eq!(session.execution_count(), 3);

    executor.reset(&mut session).unwrap();
    assert_eq!(session.execution_count(), 0);
    assert_ne!(session.id(), original_id);

    let outcome = executor.execute_cell(&mut session, "print(x)").unwrap();
    assert!(outcome.into_text().contains("NameError"));
}

#[test]
fn test_foreign_session_is_rejected() {
    let owner = executor();
    let other = executor();
    let mut session = owner.new_session();

    let err = other.execute_cell(&mut session, "print(1)").unwrap_err();
    assert!(matches!(err, Error::ForeignSession { session: id } if id == session.id()));
    assert!(other.reset(&mut session).is_err());
    assert_eq!(session.execution_count(), 0);
}

// =============================================================================
// Notebook runner
// =============================================================================

#[test]
fn test_run_all_cells() {
    let executor = executor();
    let mut session = executor.new_session();
    let cells = parse_cells(sample_notebook());
    assert_eq!(cells.len(), 5);

    let runner = NotebookRunner::new(&executor);
    let reports = runner.run(&mut session, &cells, CellSelection::All).unwrap();

    // The markdown cell is skipped.
    assert_eq!(reports.len(), 4);
    assert_eq!(
        reports.iter().map(|r| r.cell_index).collect::<Vec<_>>(),
        vec![0, 2, 3, 4]
    );
    assert_eq!(
        reports.iter().map(|r| r.execution_count).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );

    assert_eq!(reports[1].output_text(), "42\n");
    assert!(reports[2].outcome.is_error());
    assert!(reports[2].output_text().contains("NameError"));
    // A failing cell does not stop the run.
    assert_eq!(reports[3].output_text(), "43\n");
}

#[test]
fn test_run_above_and_from() {
    let executor = executor();
    let mut session = executor.new_session();
    let cells = parse_cells(sample_notebook());
    let runner = NotebookRunner::new(&executor);

    let above = runner
        .run(&mut session, &cells, CellSelection::Above(3))
        .unwrap();
    assert_eq!(above.len(), 2);

    let from = runner
        .run(&mut session, &cells, CellSelection::From(4))
        .unwrap();
    assert_eq!(from.len(), 1);
    assert_eq!(from[0].output_text(), "43\n");
    assert_eq!(from[0].execution_count, 3);
}

#[test]
fn test_run_invalid_selection() {
    let executor = executor();
    let mut session = executor.new_session();
    let cells = parse_cells(sample_notebook());
    let runner = NotebookRunner::new(&executor);

    let err = runner
        .run(&mut session, &cells, CellSelection::Only(99))
        .unwrap_err();
    assert!(matches!(err, Error::CellNotFound { index: 99, count: 5 }));
    assert_eq!(session.execution_count(), 0);
}

#[test]
fn test_callback_sees_every_cell() {
    let executor = executor();
    let mut session = executor.new_session();
    let cells = parse_cells(sample_notebook());
    let recorder = RecordingCallback::default();

    let mut runner = NotebookRunner::new(&executor);
    runner.set_callback(&recorder);
    runner
        .run(&mut session, &cells, CellSelection::Above(3))
        .unwrap();

    assert_eq!(
        *recorder.events.borrow(),
        vec![
            "start 0 [1]".to_string(),
            "finish 0 ok".to_string(),
            "skip 1".to_string(),
            "start 2 [2]".to_string(),
            "finish 2 ok".to_string(),
        ]
    );
}

#[test]
fn test_export_after_run() {
    let executor = executor();
    let mut session = executor.new_session();
    let cells = parse_cells(sample_notebook());
    let reports = NotebookRunner::new(&executor)
        .run(&mut session, &cells, CellSelection::All)
        .unwrap();

    let script = export(&cells, &reports, ExportFormat::Percent);
    assert!(script.contains("print(doubled)\n# Out:\n# 42\n"));

    let markdown = export(&cells, &reports, ExportFormat::Markdown);
    assert!(markdown.contains("Doubling\n\n"));
    assert!(markdown.contains("```text\n43\n```"));
}
