//! sandbox-probe: verification harness for execution sandboxes
//!
//! Entry point for the binary. Parses the CLI, loads configuration, sets up
//! diagnostic and audit logging, then runs the selected check.
//!
//! # I/O Architecture
//!
//! - **Report**: stdout, the human-readable result of the check
//! - **Diagnostics**: stderr via `tracing`, silent below warn unless `-v`
//! - **Audit**: syslog, only with `--syslog`
//!
//! Exit status is 0 when every check holds, 1 when a check does not, and 2
//! for configuration errors.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use sandbox_probe::{
    cli::Cli,
    commands,
    config::{ConfigError, ConfigLoader, HarnessConfig},
    telemetry::AuditLogger,
};
use tracing::{debug, warn};

/// Exit status for configuration errors.
const EXIT_CONFIG_ERROR: u8 = 2;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            if err.chain().any(|cause| cause.is::<ConfigError>()) {
                ExitCode::from(EXIT_CONFIG_ERROR)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose)?;

    debug!("Parsed CLI arguments: {:?}", cli);

    let config = ConfigLoader::new()
        .load(&cli)
        .context("Failed to load configuration")?;

    debug!("Loaded configuration: {:?}", config);

    let harness =
        HarnessConfig::from_config(config).context("Invalid configuration")?;

    debug!("Resolved harness configuration: {:?}", harness);

    let audit = if cli.syslog {
        match AuditLogger::new() {
            Ok(logger) => logger,
            Err(e) => {
                warn!("{}; audit events will be discarded", e);
                AuditLogger::new_null()
            }
        }
    } else {
        AuditLogger::new_null()
    };

    commands::handle_command(&cli.command, &harness, &audit)
}

/// Initialize the tracing subscriber for diagnostic logging.
///
/// # Verbosity Levels
/// - 0 (default): Only warnings and errors, or `RUST_LOG` if set
/// - 1 (-v): Info level
/// - 2 (-vv): Debug level
/// - 3+ (-vvv): Trace level
fn init_tracing(verbose: u8) -> Result<()> {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .context("Failed to initialize tracing subscriber")?;

    Ok(())
}
