//! pycell CLI - run Python scripts and percent-format notebooks in an embedded interpreter.

mod cells;
mod colors;
mod output;
mod run;
mod source;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use pycell_core::ExecutorConfig;
use pycell_core::notebook::ExportFormat;

#[derive(Parser)]
#[command(name = "pycell")]
#[command(about = "Run Python code in an embedded interpreter with captured output")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Extra module search directory (repeatable)
    #[arg(long = "path", value_name = "DIR", global = true)]
    search_paths: Vec<PathBuf>,

    /// Do not look for a host CPython standard library
    #[arg(long, global = true)]
    no_host_stdlib: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a script once in a fresh namespace
    Run {
        /// Path to the script, or `-` for stdin
        script: String,
    },

    /// Check a script for syntax errors without running it
    Check {
        /// Path to the script, or `-` for stdin
        script: String,
    },

    /// Run a percent-format (`# %%`) notebook in one session
    Cells {
        /// Path to the notebook, or `-` for stdin
        notebook: String,

        /// Run only this cell (0-based)
        #[arg(long, conflicts_with_all = ["above", "from"])]
        cell: Option<usize>,

        /// Run every cell before this one
        #[arg(long, conflicts_with = "from")]
        above: Option<usize>,

        /// Run this cell and every cell after it
        #[arg(long)]
        from: Option<usize>,

        /// Print reports as JSON instead of In/Out blocks
        #[arg(long)]
        json: bool,

        /// Export the notebook with its outputs
        #[arg(long, value_enum)]
        export: Option<ExportKind>,

        /// Output path for --export (default: stdout)
        #[arg(short, long, requires = "export")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportKind {
    /// Percent-format Python script
    Py,
    /// Markdown document
    Md,
}

impl From<ExportKind> for ExportFormat {
    fn from(kind: ExportKind) -> Self {
        match kind {
            ExportKind::Py => ExportFormat::Percent,
            ExportKind::Md => ExportFormat::Markdown,
        }
    }
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::from_default_env()
            .add_directive(tracing::Level::DEBUG.into())
    } else {
        tracing_subscriber::EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Helper to format pycell-core errors with recovery hints
    let format_error = |err: anyhow::Error| -> anyhow::Error {
        if let Some(core_err) = err.downcast_ref::<pycell_core::Error>() {
            anyhow::anyhow!("{}", core_err.with_hint())
        } else {
            err
        }
    };

    let config = cli
        .search_paths
        .iter()
        .fold(ExecutorConfig::default(), |config, path| config.with_search_path(path.clone()))
        .with_host_stdlib(!cli.no_host_stdlib);

    let code = match cli.command {
        Commands::Run { script } => run::execute(&script, config).map_err(format_error)?,

        Commands::Check { script } => run::check(&script, config).map_err(format_error)?,

        Commands::Cells {
            notebook,
            cell,
            above,
            from,
            json,
            export,
            output,
        } => {
            let options = cells::CellsOptions {
                selection: cells::selection(cell, above, from),
                json,
                export: export.map(ExportFormat::from),
                output,
            };
            cells::execute(&notebook, config, &options).map_err(format_error)?
        }
    };

    Ok(code)
}
