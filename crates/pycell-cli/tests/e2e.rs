//! End-to-end tests for pycell CLI commands.
//!
//! These tests run the built binary against real scripts and notebooks.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Create a temporary directory with a test file.
struct TestFile {
    temp_dir: TempDir,
    path: PathBuf,
}

impl TestFile {
    fn new(filename: &str, source: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(filename);
        fs::write(&path, source).expect("Failed to write test file");

        Self { temp_dir, path }
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn sibling(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }
}

/// The binary with a deterministic interpreter setup.
fn pycell() -> Command {
    let mut cmd = Command::cargo_bin("pycell").expect("binary is built");
    cmd.arg("--no-host-stdlib");
    cmd
}

fn notebook() -> &'static str {
    r#"total = 40
# %% [markdown]
# Add two
# %%
total += 2
print(total)
# %%
print(total / 0)
"#
}

// =============================================================================
// run
// =============================================================================

#[test]
fn test_run_prints_output() {
    let script = TestFile::new("hello.py", "print('hello from pycell')\n");

    pycell()
        .arg("run")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::eq("hello from pycell\n"));
}

#[test]
fn test_run_from_stdin() {
    pycell()
        .args(["run", "-"])
        .write_stdin("print(6 * 7)\n")
        .assert()
        .success()
        .stdout(predicate::eq("42\n"));
}

#[test]
fn test_run_failure_exits_nonzero() {
    let script = TestFile::new("boom.py", "print('before')\nraise ValueError('boom')\n");

    pycell()
        .arg("run")
        .arg(script.path())
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("before\n"))
        .stdout(predicate::str::contains("ValueError: boom"));
}

#[test]
fn test_run_missing_file() {
    pycell()
        .args(["run", "/no/such/script.py"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"))
        .stderr(predicate::str::contains("hint:"));
}

#[test]
fn test_search_path_flag() {
    let script = TestFile::new("main.py", "import helper\nprint(helper.VALUE)\n");
    fs::write(script.sibling("helper.py"), "VALUE = 'imported'\n").unwrap();

    pycell()
        .arg("--path")
        .arg(script.temp_dir.path())
        .arg("run")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::eq("imported\n"));
}

// =============================================================================
// check
// =============================================================================

#[test]
fn test_check_ok() {
    let script = TestFile::new("ok.py", "x = 1\n");

    pycell()
        .arg("check")
        .arg(script.path())
        .assert()
        .success()
        .stdout(predicate::eq("OK\n"));
}

#[test]
fn test_check_error() {
    let script = TestFile::new("bad.py", "x = 1\ny = (\n");

    pycell()
        .arg("check")
        .arg(script.path())
        .assert()
        .code(1)
        .stdout(predicate::str::starts_with("ERR:"));
}

// =============================================================================
// cells
// =============================================================================

#[test]
fn test_cells_prints_in_out_blocks() {
    let nb = TestFile::new("nb.py", notebook());

    pycell()
        .arg("cells")
        .arg(nb.path())
        .assert()
        .code(1)
        .stdout(predicate::str::contains("In [1]"))
        .stdout(predicate::str::contains("Out [2]:\n42\n"))
        .stdout(predicate::str::contains("ZeroDivisionError"))
        .stdout(predicate::str::contains("Ran 3 cells, 1 failed"));
}

#[test]
fn test_cells_only_one() {
    let nb = TestFile::new("nb.py", notebook());

    pycell()
        .arg("cells")
        .arg(nb.path())
        .args(["--cell", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ran 1 cells, 0 failed"));
}

#[test]
fn test_cells_json() {
    let nb = TestFile::new("nb.py", notebook());

    let output = pycell()
        .arg("cells")
        .arg(nb.path())
        .args(["--above", "3", "--json"])
        .output()
        .expect("runs");
    assert!(output.status.success());

    let reports: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    let reports = reports.as_array().expect("array of reports");
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[1]["cell_index"], 2);
    assert_eq!(reports[1]["execution_count"], 2);
    assert_eq!(reports[1]["outcome"]["status"], "success");
    assert_eq!(reports[1]["outcome"]["stdout"], "42\n");
    assert!(reports[1]["elapsed_ms"].is_u64());
}

#[test]
fn test_cells_out_of_range() {
    let nb = TestFile::new("nb.py", notebook());

    pycell()
        .arg("cells")
        .arg(nb.path())
        .args(["--cell", "9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cell not found"));
}

#[test]
fn test_cells_export_markdown() {
    let nb = TestFile::new("nb.py", notebook());
    let out = nb.sibling("nb.md");

    pycell()
        .arg("cells")
        .arg(nb.path())
        .args(["--from", "2", "--export", "md", "--output"])
        .arg(&out)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("Exported"));

    let markdown = fs::read_to_string(&out).expect("export written");
    assert!(markdown.contains("Add two"));
    assert!(markdown.contains("```python\ntotal += 2\nprint(total)\n```"));
}

#[test]
fn test_cells_export_to_stdout() {
    let nb = TestFile::new("nb.py", "print('x')\n");

    pycell()
        .arg("cells")
        .arg(nb.path())
        .args(["--export", "py"])
        .assert()
        .success()
        .stdout(predicate::str::contains("# Out:\n# x\n"))
        .stdout(predicate::str::contains("In [").not());
}

#[test]
fn test_cells_without_code() {
    let nb = TestFile::new("empty.py", "# %% [markdown]\n# Only prose\n");

    pycell()
        .arg("cells")
        .arg(nb.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("No code cells found"));
}
