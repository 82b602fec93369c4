//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while assembling the harness configuration.
///
/// All of these are fatal and are reported before any probe or request runs.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file {path}: {source}")]
    ReadError {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse a TOML configuration file.
    #[error("Failed to parse config file {path}: {source}")]
    ParseError {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// The underlying TOML parse error.
        source: toml::de::Error,
    },

    /// A required environment variable is not set.
    #[error("{variable} environment variable is not set")]
    Missing {
        /// Name of the missing variable.
        variable: String,
    },

    /// A configuration value is invalid.
    #[error("Invalid config value for {field}: {message}")]
    InvalidValue {
        /// The field name that has an invalid value.
        field: String,
        /// Description of why the value is invalid.
        message: String,
    },

    /// The proxy URL from the environment could not be used.
    #[error("Invalid proxy URL '{url}': {message}")]
    InvalidProxyUrl {
        /// The offending URL, with credentials redacted.
        url: String,
        /// Description of the problem.
        message: String,
    },
}
