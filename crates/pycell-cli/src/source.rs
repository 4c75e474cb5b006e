//! Loading program text from a path or stdin.

use std::io::Read;
use std::path::PathBuf;

use pycell_core::Error;

/// Path argument meaning "read from stdin".
pub const STDIN_ARG: &str = "-";

/// Read the whole script named by `arg`.
pub fn load(arg: &str) -> anyhow::Result<String> {
    if arg == STDIN_ARG {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        return Ok(source);
    }

    std::fs::read_to_string(arg).map_err(|source| {
        Error::Read {
            path: PathBuf::from(arg),
            source,
        }
        .into()
    })
}

/// Name to show in headers for `arg`.
pub fn display_name(arg: &str) -> &str {
    if arg == STDIN_ARG { "<stdin>" } else { arg }
}
