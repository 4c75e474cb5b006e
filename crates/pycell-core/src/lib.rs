//! Core engine for pycell.
//!
//! This crate provides:
//! - An embedded Python interpreter with captured stdout/stderr
//! - One-shot execution and persistent, notebook-style sessions
//! - Syntax checking with a one-line status format
//! - Percent-format (`# %%`) notebook parsing, running and export

pub mod config;
pub mod error;
pub mod execute;
pub mod notebook;
pub mod syntax;

pub use config::ExecutorConfig;
pub use error::{Error, Result};
pub use execute::{ExecutionOutcome, Executor, Session, SyntaxDiagnostic};
pub use notebook::{Cell, CellKind, CellReport, CellSelection, NotebookRunner, RunCallback};
pub use syntax::SyntaxStatus;
