//! Command-line interface definitions for sandbox-probe.
//!
//! Uses clap's derive API for type-safe argument parsing.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Verification harness for execution sandboxes.
///
/// sandbox-probe runs inside a sandbox and checks that protected host paths
/// are unreachable, that the sandbox's own scratch storage is writable, and
/// that outbound traffic only leaves through the mandated egress proxy.
#[derive(Parser, Debug)]
#[command(name = "sandbox-probe")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Check to run.
    #[command(subcommand)]
    pub command: Commands,

    /// Path to additional config file.
    ///
    /// Merged on top of the system and user configs. Unlike those, a
    /// missing file here is an error.
    #[arg(short = 'c', long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Mirror results to syslog as JSON audit events.
    #[arg(long = "syslog", global = true)]
    pub syslog: bool,

    /// Increase log verbosity.
    ///
    /// Can be specified multiple times:
    /// -v    = info level
    /// -vv   = debug level
    /// -vvv  = trace level
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Checks offered by sandbox-probe.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Probe filesystem boundaries and report an aggregate verdict.
    Boundary,

    /// Fetch from the external API through the egress proxy.
    Egress(EgressArgs),
}

/// Overrides for the egress check.
#[derive(Args, Debug, Default, Clone)]
pub struct EgressArgs {
    /// External API origin, e.g. `https://api.stripe.com`.
    #[arg(long = "origin", value_name = "URL")]
    pub origin: Option<String>,

    /// Maximum number of records to request.
    #[arg(long = "limit", value_name = "N")]
    pub limit: Option<u32>,

    /// Request timeout in seconds.
    #[arg(long = "timeout-secs", value_name = "SECS")]
    pub timeout_secs: Option<u64>,

    /// Environment variable holding the API key.
    #[arg(long = "api-key-var", value_name = "NAME")]
    pub api_key_var: Option<String>,
}

impl Cli {
    /// Egress overrides, if the egress subcommand was selected.
    pub fn egress_args(&self) -> Option<&EgressArgs> {
        match &self.command {
            Commands::Egress(args) => Some(args),
            Commands::Boundary => None,
        }
    }
}
