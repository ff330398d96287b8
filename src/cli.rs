// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `installer-shim`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "installer-shim",
    version,
    about = "Drive an interactive installer script and expose its progress over HTTP.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `installer-shim.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "installer-shim.toml")]
    pub config: String,

    /// Override `[server].bind` (e.g. `127.0.0.1:8000`).
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Override `[installer].program`.
    #[arg(long, value_name = "PATH")]
    pub installer: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `INSTALLER_SHIM_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate, print the resolved config, but don't serve.
    #[arg(long)]
    pub dry_run: bool,
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
