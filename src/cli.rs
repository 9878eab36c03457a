// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `gob`.
///
/// Flags left unset fall back to the package's `.gob.toml`, then to the
/// built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "gob",
    version,
    about = "Rebuild and restart a Go program whenever its sources change.",
    long_about = None
)]
pub struct CliArgs {
    /// Package path (relative to the source root), source file, directory,
    /// or a JSON file under the source root listing several packages.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Arguments passed to the program when it is started.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub program_args: Vec<String>,

    /// Rebuild on changes, but never run the program.
    #[arg(long)]
    pub norun: bool,

    /// Watch templates and notify subscribed agents of changes.
    #[arg(long)]
    pub agent: bool,

    /// Port the template server listens on for subscribers.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Also watch the dependencies of the target package.
    #[arg(long)]
    pub deps: bool,

    /// Follow workspace imports transitively when collecting dependencies.
    #[arg(long, value_name = "BOOL")]
    pub recursive: Option<bool>,

    /// Maximum number of dependency directories to watch.
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Include standard-library imports in the dependency graph.
    #[arg(long)]
    pub stdlib: bool,

    /// Source root of all packages (default: `$GOPATH/src`).
    #[arg(long, value_name = "DIR")]
    pub src_dir: Option<PathBuf>,

    /// Where binaries are written (default: `$GOPATH/gob/build`).
    #[arg(long, value_name = "DIR")]
    pub build_dir: Option<PathBuf>,

    /// Ignore the package's `.gob.toml`.
    #[arg(long)]
    pub no_config: bool,

    /// Save the effective settings to the package's `.gob.toml`.
    #[arg(long)]
    pub save_config: bool,

    /// Resolve the target, print the dependency tree and watch set, and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `GOB_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
