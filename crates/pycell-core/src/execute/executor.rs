//! The executor: one embedded interpreter, one-shot runs, cell runs and syntax checks.

use rustpython_vm::Interpreter;
use uuid::Uuid;

use crate::config::ExecutorConfig;
use crate::error::{Error, Result};
use crate::syntax::SyntaxStatus;

use super::outcome::ExecutionOutcome;
use super::runtime::{build_interpreter, compile_and_run, compile_only, fresh_scope};
use super::session::Session;

/// Runs Python source text in an embedded interpreter and captures its output.
///
/// One-shot runs get a fresh namespace every call. Cell runs execute inside a
/// [`Session`] whose namespace persists across calls. The executor also owns a
/// default session backing the string-returning [`run_cell`](Self::run_cell)
/// and [`reset_session`](Self::reset_session).
///
/// Executed code is not sandboxed and has no time or memory limit.
///
/// # Example
///
/// ```no_run
/// use pycell_core::Executor;
///
/// let mut executor = Executor::new();
/// assert_eq!(executor.run_user_code("print('hi')"), "hi\n");
///
/// executor.run_cell("a = 1");
/// assert_eq!(executor.run_cell("print(a)"), "1\n");
///
/// assert_eq!(executor.check_syntax("x = 1"), "OK");
/// ```
pub struct Executor {
    /// Executor identity, stamped on every session it creates.
    id: Uuid,
    /// Interpreter configuration.
    config: ExecutorConfig,
    /// Session behind the flat `run_cell` / `reset_session` API.
    /// Declared before `interpreter` so its objects are released first.
    session: Session,
    /// The embedded interpreter.
    interpreter: Interpreter,
}

impl Executor {
    /// Create an executor with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ExecutorConfig::default())
    }

    /// Create an executor with an explicit configuration.
    pub fn with_config(config: ExecutorConfig) -> Self {
        let id = Uuid::new_v4();
        let interpreter = build_interpreter(&config);
        let session = interpreter.enter(|vm| Session::new(id, fresh_scope(vm)));
        tracing::debug!("executor {} ready", id);

        Self {
            id,
            config,
            session,
            interpreter,
        }
    }

    /// Get the executor configuration.
    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Create a new, empty session bound to this executor.
    pub fn new_session(&self) -> Session {
        self.interpreter
            .enter(|vm| Session::new(self.id, fresh_scope(vm)))
    }

    /// Run `source` once in a fresh namespace.
    pub fn execute(&self, source: &str) -> ExecutionOutcome {
        if source.trim().is_empty() {
            return ExecutionOutcome::empty();
        }

        let source_name = &self.config.one_shot_source_name;
        self.interpreter
            .enter(|vm| compile_and_run(vm, source, source_name, fresh_scope(vm)))
    }

    /// Run `source` inside `session`, reading and writing its namespace.
    ///
    /// Returns `Error::ForeignSession` if the session came from another executor.
    pub fn execute_cell(&self, session: &mut Session, source: &str) -> Result<ExecutionOutcome> {
        self.ensure_owned(session)?;
        Ok(run_in_session(
            &self.interpreter,
            &self.config,
            session,
            source,
        ))
    }

    /// Replace the session's namespace with a fresh one and zero its counter.
    pub fn reset(&self, session: &mut Session) -> Result<()> {
        self.ensure_owned(session)?;
        *session = self.new_session();
        tracing::info!("session reset (now {})", session.id());
        Ok(())
    }

    /// Check `source` for syntax errors without running it.
    pub fn check(&self, source: &str) -> SyntaxStatus {
        let source_name = &self.config.check_source_name;
        match self
            .interpreter
            .enter(|vm| compile_only(vm, source, source_name))
        {
            None => SyntaxStatus::Valid,
            Some(diagnostic) => SyntaxStatus::from(diagnostic),
        }
    }

    /// The default session used by [`run_cell`](Self::run_cell).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// One-shot run, flattened to text.
    ///
    /// Blank input yields `""`. A syntax error yields the error report alone;
    /// otherwise stdout, then stderr, then any traceback.
    pub fn run_user_code(&self, source: &str) -> String {
        self.execute(source).into_text()
    }

    /// Cell run in the default session, flattened to text.
    pub fn run_cell(&mut self, source: &str) -> String {
        run_in_session(&self.interpreter, &self.config, &mut self.session, source).into_text()
    }

    /// Discard the default session's namespace.
    pub fn reset_session(&mut self) {
        self.session = self.new_session();
        tracing::info!("default session reset (now {})", self.session.id());
    }

    /// Syntax check rendered as `OK` or `ERR:<line>:<column>:<message>`.
    pub fn check_syntax(&self, source: &str) -> String {
        self.check(source).to_string()
    }

    fn ensure_owned(&self, session: &Session) -> Result<()> {
        if session.owner() == self.id {
            Ok(())
        } else {
            Err(Error::ForeignSession {
                session: session.id(),
            })
        }
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

fn run_in_session(
    interpreter: &Interpreter,
    config: &ExecutorConfig,
    session: &mut Session,
    source: &str,
) -> ExecutionOutcome {
    let count = session.record_run();
    if source.trim().is_empty() {
        return ExecutionOutcome::empty();
    }

    tracing::debug!("session {}: running cell [{}]", session.id(), count);
    let scope = session.scope();
    interpreter.enter(|vm| compile_and_run(vm, source, &config.cell_source_name, scope))
}
