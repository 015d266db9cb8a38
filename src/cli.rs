// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `arbdeploy`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "arbdeploy",
    version,
    about = "Deploy the arbitrage bot to a remote host and supervise it with systemd.",
    long_about = None
)]
pub struct CliArgs {
    /// Deployment target in `user@host` form.
    ///
    /// The user part is also used as the `User=` of the installed service.
    #[arg(value_name = "TARGET")]
    pub target: String,

    /// Path to an SSH private key passed to `ssh`/`scp` via `-i`.
    ///
    /// If omitted, the ambient SSH agent / default identity is used.
    #[arg(long, value_name = "PATH")]
    pub key: Option<String>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Deploy.toml` in the current working directory. The file is
    /// optional; built-in defaults are used when it does not exist.
    #[arg(long, value_name = "PATH", default_value = "Deploy.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `ARBDEPLOY_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve config and print the deployment plan, but don't touch the host.
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
