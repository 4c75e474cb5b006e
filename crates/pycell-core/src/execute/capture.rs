//! Output capture for executed code.
//!
//! `sys.stdout` and `sys.stderr` are swapped for small namespace objects whose
//! `write(s)` appends to a Rust-side buffer. `print()` and tracebacks printed
//! by user code both go through `sys.*.write`, so this catches everything the
//! program writes through Python.

use std::sync::{Arc, Mutex, PoisonError};

use rustpython_vm::{function::FuncArgs, PyObjectRef, PyResult, VirtualMachine};

/// A single growable text buffer shared with a Python writer object.
#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<String>>);

impl SharedBuffer {
    fn push(&self, text: &str) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    fn take(&self) -> String {
        std::mem::take(&mut *self.0.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// The two buffers that receive a run's stdout and stderr.
///
/// Created fresh for every execution.
#[derive(Clone, Default)]
pub struct OutputCapture {
    stdout: SharedBuffer,
    stderr: SharedBuffer,
}

impl OutputCapture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain both buffers, returning `(stdout, stderr)`.
    pub fn take(&self) -> (String, String) {
        (self.stdout.take(), self.stderr.take())
    }
}

/// Scope guard that redirects `sys.stdout`/`sys.stderr` into an [`OutputCapture`].
///
/// The original stream objects are put back when the guard is dropped, on
/// every exit path of the enclosing scope.
pub struct StreamRedirect<'vm> {
    vm: &'vm VirtualMachine,
    saved_stdout: Option<PyObjectRef>,
    saved_stderr: Option<PyObjectRef>,
}

impl<'vm> StreamRedirect<'vm> {
    /// Install capture writers for the lifetime of the returned guard.
    pub fn install(vm: &'vm VirtualMachine, capture: &OutputCapture) -> Self {
        let saved_stdout = vm.sys_module.get_attr("stdout", vm).ok();
        let saved_stderr = vm.sys_module.get_attr("stderr", vm).ok();

        let stdout = build_writer(vm, capture.stdout.clone());
        let stderr = build_writer(vm, capture.stderr.clone());
        if vm.sys_module.set_attr("stdout", stdout, vm).is_err()
            || vm.sys_module.set_attr("stderr", stderr, vm).is_err()
        {
            tracing::warn!("could not redirect sys.stdout/sys.stderr; output will not be captured");
        }

        Self {
            vm,
            saved_stdout,
            saved_stderr,
        }
    }
}

impl Drop for StreamRedirect<'_> {
    fn drop(&mut self) {
        let vm = self.vm;
        for (name, saved) in [
            ("stdout", self.saved_stdout.take()),
            ("stderr", self.saved_stderr.take()),
        ] {
            let Some(original) = saved else { continue };
            if vm.sys_module.set_attr(name, original, vm).is_err() {
                tracing::warn!("failed to restore sys.{}", name);
            }
        }
    }
}

/// Build a minimal file-like object: `write`, `flush`, `closed`, `encoding`.
fn build_writer(vm: &VirtualMachine, buffer: SharedBuffer) -> PyObjectRef {
    let write = vm.new_function(
        "write",
        move |args: FuncArgs, vm: &VirtualMachine| -> PyResult<PyObjectRef> {
            let text = match args.args.first() {
                Some(obj) => obj.str(vm)?.as_str().to_owned(),
                None => String::new(),
            };
            buffer.push(&text);
            Ok(vm.ctx.new_int(text.chars().count()).into())
        },
    );
    let flush = vm.new_function(
        "flush",
        |_args: FuncArgs, vm: &VirtualMachine| -> PyResult<PyObjectRef> { Ok(vm.ctx.none()) },
    );

    let writer = vm.new_module("<capture>", vm.ctx.new_dict(), None);
    let _ = writer.set_attr("write", write, vm);
    let _ = writer.set_attr("flush", flush, vm);
    let _ = writer.set_attr("closed", vm.ctx.new_bool(false), vm);
    let _ = writer.set_attr("encoding", vm.ctx.new_str("utf-8"), vm);
    writer.into()
}
