//! Execution engine for pycell.
//!
//! Compiles Python source in an embedded RustPython interpreter, runs it with
//! `sys.stdout`/`sys.stderr` redirected into buffers, and turns the result into
//! an [`ExecutionOutcome`].
//!
//! # Modes
//!
//! - **One-shot** ([`Executor::execute`], [`Executor::run_user_code`]) - fresh
//!   namespace per call, discarded afterwards.
//! - **Cell** ([`Executor::execute_cell`], [`Executor::run_cell`]) - runs in a
//!   [`Session`] whose namespace persists until reset.
//! - **Check** ([`Executor::check`], [`Executor::check_syntax`]) - compile only.
//!
//! # Architecture
//!
//! ```text
//! Executor
//!     │
//!     ├── Interpreter (RustPython, built from ExecutorConfig)
//!     │
//!     └── compile_and_run
//!             │
//!             ├── vm.compile ──── SyntaxError ──> CompileError(SyntaxDiagnostic)
//!             │
//!             └── StreamRedirect (sys.stdout/sys.stderr -> OutputCapture)
//!                     │
//!                     └── vm.run_code_obj(scope)
//!                             ├── Ok  ──> Success { stdout, stderr }
//!                             └── Err ──> RuntimeError { stdout, stderr, trace }
//! ```
//!
//! # Module Structure
//!
//! - `capture` - Output buffers and the stream redirection guard
//! - `executor` - The `Executor` facade
//! - `outcome` - `ExecutionOutcome` and its text flattening
//! - `runtime` - Interpreter construction, compile and run steps
//! - `session` - Persistent namespaces for cell mode

mod capture;
mod executor;
mod outcome;
mod runtime;
mod session;

pub use capture::{OutputCapture, StreamRedirect};
pub use executor::Executor;
pub use outcome::{ExecutionOutcome, SyntaxDiagnostic};
pub use runtime::MAIN_MODULE_NAME;
pub use session::Session;
