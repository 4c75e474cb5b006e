//! Interpreter construction and the low-level compile/run steps.

use rustpython_vm::{
    builtins::PyBaseExceptionRef, compiler::CompileError, scope::Scope, AsObject, Interpreter,
    PyObjectRef, Settings, VirtualMachine,
};

use crate::config::ExecutorConfig;
use crate::syntax::sanitize_message;

use super::capture::{OutputCapture, StreamRedirect};
use super::outcome::{ExecutionOutcome, SyntaxDiagnostic};

/// Value of the marker entry seeded into every fresh namespace.
pub const MAIN_MODULE_NAME: &str = "__main__";

/// Create an interpreter configured from `config`.
pub fn build_interpreter(config: &ExecutorConfig) -> Interpreter {
    let mut settings = Settings::default();
    settings.path_list.extend(config.resolved_search_paths());
    tracing::debug!("interpreter search path: {:?}", settings.path_list);

    let native_modules = config.native_modules;
    let recursion_limit = config.recursion_limit;
    Interpreter::with_init(settings, move |vm| {
        vm.recursion_limit.set(recursion_limit);
        if native_modules {
            vm.add_native_modules(rustpython_stdlib::get_module_inits());
        }
    })
}

/// A fresh namespace holding only builtins and `__name__ = "__main__"`.
pub fn fresh_scope(vm: &VirtualMachine) -> Scope {
    let scope = vm.new_scope_with_builtins();
    if let Err(exc) = scope
        .globals
        .set_item("__name__", vm.ctx.new_str(MAIN_MODULE_NAME).into(), vm)
    {
        tracing::warn!("failed to seed __name__: {}", render_exception(vm, &exc));
    }
    scope
}

/// Compile `source` and run it in `scope` with output captured.
pub fn compile_and_run(
    vm: &VirtualMachine,
    source: &str,
    source_name: &str,
    scope: Scope,
) -> ExecutionOutcome {
    let code = match vm.compile(source, rustpython_vm::compiler::Mode::Exec, source_name.to_owned())
    {
        Ok(code) => code,
        Err(err) => {
            tracing::debug!("{} failed to compile: {}", source_name, err);
            return ExecutionOutcome::CompileError(diagnose(vm, &err, source, source_name));
        }
    };

    let capture = OutputCapture::new();
    let result = {
        let _redirect = StreamRedirect::install(vm, &capture);
        vm.run_code_obj(code, scope)
    };
    let (stdout, stderr) = capture.take();

    match result {
        Ok(_) => ExecutionOutcome::Success { stdout, stderr },
        Err(exc) => {
            let trace = render_exception(vm, &exc);
            tracing::debug!("{} raised: {}", source_name, trace.lines().last().unwrap_or(""));
            ExecutionOutcome::RuntimeError {
                stdout,
                stderr,
                trace,
            }
        }
    }
}

/// Compile without running. `None` means the source is syntactically valid.
pub fn compile_only(
    vm: &VirtualMachine,
    source: &str,
    source_name: &str,
) -> Option<SyntaxDiagnostic> {
    vm.compile(source, rustpython_vm::compiler::Mode::Exec, source_name.to_owned())
        .err()
        .map(|err| diagnose(vm, &err, source, source_name))
}

/// Full traceback text for an exception, as `traceback.print_exc` renders it.
pub fn render_exception(vm: &VirtualMachine, exc: &PyBaseExceptionRef) -> String {
    let mut out = String::new();
    if vm.write_exception(&mut out, exc).is_err() {
        out = exc
            .as_object()
            .str(vm)
            .map(|s| s.as_str().to_owned())
            .unwrap_or_else(|_| "<unprintable exception>".to_owned());
    }
    out
}

/// Turn a compiler error into a diagnostic.
///
/// The position comes from the `SyntaxError` the interpreter would raise. The
/// message is the bare error description: the exception's `msg` also carries
/// the echoed source line and caret, which belong in the trace only.
fn diagnose(
    vm: &VirtualMachine,
    err: &CompileError,
    source: &str,
    source_name: &str,
) -> SyntaxDiagnostic {
    let exc = vm.new_syntax_error(err, Some(source));
    let (row, col) = err.python_location();

    let line = int_attr(vm, &exc, "lineno").unwrap_or(row).max(1);
    let column = int_attr(vm, &exc, "offset").unwrap_or(col).max(1);

    let mut trace = render_exception(vm, &exc);
    if !trace.contains(&format!("File \"{source_name}\"")) {
        trace.insert_str(0, &format!("  File \"{source_name}\", line {line}\n"));
    }

    SyntaxDiagnostic {
        line,
        column,
        message: sanitize_message(&error_description(&err.to_string())),
        trace,
    }
}

/// First line of a compiler error with its ` at line L column C` suffix removed.
fn error_description(text: &str) -> String {
    let first = text.lines().next().unwrap_or_default().trim();
    let description = match first.rfind(" at line ") {
        Some(at) if is_location(&first[at + " at line ".len()..]) => &first[..at],
        _ => first,
    };

    let description = description.trim();
    if description.is_empty() {
        "invalid syntax".to_owned()
    } else {
        description.to_owned()
    }
}

/// Whether `text` is exactly `<line> column <column>`.
fn is_location(text: &str) -> bool {
    text.split_once(" column ").is_some_and(|(line, column)| {
        line.parse::<usize>().is_ok() && column.parse::<usize>().is_ok()
    })
}

fn attr(
    vm: &VirtualMachine,
    exc: &PyBaseExceptionRef,
    name: &'static str,
) -> Option<PyObjectRef> {
    exc.as_object()
        .get_attr(name, vm)
        .ok()
        .filter(|value| !vm.is_none(value))
}

fn int_attr(
    vm: &VirtualMachine,
    exc: &PyBaseExceptionRef,
    name: &'static str,
) -> Option<usize> {
    attr(vm, exc, name)?.try_into_value::<usize>(vm).ok()
}
