//! Persistent execution sessions.
//!
//! A session owns the namespace that cell runs read from and write to, so
//! definitions made by one cell are visible to the next. Sessions are created
//! by an [`Executor`](super::Executor) and are only valid with that executor:
//! the namespace holds objects that live in its interpreter.

use rustpython_vm::scope::Scope;
use uuid::Uuid;

/// Notebook-style persistent namespace plus its execution counter.
///
/// Not `Send`: the namespace is tied to the interpreter thread.
pub struct Session {
    /// Session identifier, new on every reset.
    id: Uuid,
    /// Executor that created the namespace.
    owner: Uuid,
    /// Globals and locals shared by all cell runs.
    scope: Scope,
    /// Number of cells run since creation or the last reset.
    execution_count: usize,
}

impl Session {
    pub(crate) fn new(owner: Uuid, scope: Scope) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner,
            scope,
            execution_count: 0,
        }
    }

    /// Get the session ID.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Number of cells run so far; the `n` of the last `In [n]`.
    pub fn execution_count(&self) -> usize {
        self.execution_count
    }

    pub(crate) fn owner(&self) -> Uuid {
        self.owner
    }

    pub(crate) fn scope(&self) -> Scope {
        self.scope.clone()
    }

    /// Count a cell run and return its execution number.
    pub(crate) fn record_run(&mut self) -> usize {
        self.execution_count += 1;
        self.execution_count
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("execution_count", &self.execution_count)
            .finish_non_exhaustive()
    }
}
