//! Configuration for the embedded interpreter.

use std::path::{Path, PathBuf};

/// Synthetic source name for one-shot execution.
pub const ONE_SHOT_SOURCE_NAME: &str = "<user>";

/// Synthetic source name for persistent cell execution.
pub const CELL_SOURCE_NAME: &str = "<cell>";

/// Synthetic source name for syntax checks.
pub const CHECK_SOURCE_NAME: &str = "<check>";

/// Python call depth at which `RecursionError` is raised.
///
/// Each Python frame costs several kilobytes of native stack, so this is sized
/// to stay inside a 2 MiB thread stack. Raise it only for executors running on
/// a thread with a larger stack.
pub const DEFAULT_RECURSION_LIMIT: usize = 120;

/// Configuration for an [`Executor`](crate::Executor).
#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Source name reported in tracebacks for one-shot runs.
    pub one_shot_source_name: String,

    /// Source name reported in tracebacks for cell runs.
    pub cell_source_name: String,

    /// Source name used when only checking syntax.
    pub check_source_name: String,

    /// Extra directories appended to `sys.path`.
    pub search_paths: Vec<PathBuf>,

    /// Append a host CPython stdlib directory to `sys.path` when one is found.
    pub host_stdlib: bool,

    /// Register the Rust-implemented stdlib modules (`math`, `_json`, ...).
    pub native_modules: bool,

    /// Maximum Python call depth before `RecursionError`.
    pub recursion_limit: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            one_shot_source_name: ONE_SHOT_SOURCE_NAME.to_string(),
            cell_source_name: CELL_SOURCE_NAME.to_string(),
            check_source_name: CHECK_SOURCE_NAME.to_string(),
            search_paths: Vec::new(),
            host_stdlib: true,
            native_modules: true,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl ExecutorConfig {
    /// Config with no host filesystem lookups: only builtins and native modules.
    pub fn minimal() -> Self {
        Self {
            host_stdlib: false,
            ..Default::default()
        }
    }

    /// Add a directory to the module search path.
    pub fn with_search_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_paths.push(path.into());
        self
    }

    /// Enable or disable host stdlib detection.
    pub fn with_host_stdlib(mut self, enabled: bool) -> Self {
        self.host_stdlib = enabled;
        self
    }

    /// Set the Python recursion limit.
    pub fn with_recursion_limit(mut self, limit: usize) -> Self {
        self.recursion_limit = limit;
        self
    }

    /// Full list of paths handed to the interpreter, in lookup order.
    pub fn resolved_search_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .search_paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();

        if self.host_stdlib {
            if let Some(stdlib) = detect_host_stdlib() {
                paths.push(stdlib.display().to_string());
            }
        }

        paths
    }
}

/// Locate a pure-Python stdlib directory from a host CPython install.
///
/// Picks the highest `python3.N` directory under the usual prefixes that
/// contains `os.py`.
pub fn detect_host_stdlib() -> Option<PathBuf> {
    ["/usr/local/lib", "/usr/lib", "/opt/homebrew/lib"]
        .iter()
        .filter_map(|prefix| newest_stdlib_in(Path::new(prefix)))
        .max_by_key(|(minor, _)| *minor)
        .map(|(_, path)| path)
}

fn newest_stdlib_in(prefix: &Path) -> Option<(u32, PathBuf)> {
    let entries = std::fs::read_dir(prefix).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let minor = name.to_str()?.strip_prefix("python3.")?.parse::<u32>().ok()?;
            let path = entry.path();
            path.join("os.py").is_file().then_some((minor, path))
        })
        .max_by_key(|(minor, _)| *minor)
}
