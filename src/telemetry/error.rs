//! Telemetry error types.

use thiserror::Error;

/// Errors that can occur during audit logging.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// Failed to connect to syslog.
    #[error("Failed to connect to syslog: {0}")]
    SyslogConnection(String),

    /// Failed to serialize event to JSON.
    #[error("Failed to serialize audit event: {0}")]
    SerializationError(#[from] serde_json::Error),
}
