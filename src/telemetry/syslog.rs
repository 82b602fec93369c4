//! Syslog integration for audit logging.

use std::sync::Mutex;

use syslog::{Facility, Formatter3164};
use tracing::{debug, error};

use super::error::TelemetryError;
use super::events::AuditEvent;

/// Syslog tag for all audit events.
pub const SYSLOG_TAG: &str = "SANDBOX_PROBE";

/// Audit logger that writes structured JSON events to syslog.
///
/// Owned by the command handler and passed by reference; there is no global
/// instance.
pub struct AuditLogger {
    /// `None` for the null logger.
    writer: Option<Mutex<syslog::Logger<syslog::LoggerBackend, Formatter3164>>>,
}

impl AuditLogger {
    /// Create a new audit logger connected to the local syslog socket.
    pub fn new() -> Result<Self, TelemetryError> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: SYSLOG_TAG.to_string(),
            pid: std::process::id(),
        };

        let writer =
            syslog::unix(formatter).map_err(|e| TelemetryError::SyslogConnection(e.to_string()))?;

        debug!("Connected to syslog with tag '{}'", SYSLOG_TAG);
        Ok(Self {
            writer: Some(Mutex::new(writer)),
        })
    }

    /// Create a null audit logger that discards all events.
    pub fn new_null() -> Self {
        Self { writer: None }
    }

    /// Serialize an event with its timestamp.
    pub fn render(event: &AuditEvent) -> Result<String, TelemetryError> {
        Ok(serde_json::to_string(&event.with_timestamp())?)
    }

    /// Log an audit event to syslog.
    ///
    /// Failures are reported through `tracing` and never abort the run.
    pub fn log(&self, event: AuditEvent) {
        let Some(ref writer) = self.writer else {
            return;
        };

        let json = match Self::render(&event) {
            Ok(json) => json,
            Err(e) => {
                error!("{}", e);
                return;
            }
        };

        match writer.lock() {
            Ok(mut writer) => {
                if let Err(e) = writer.info(&json) {
                    error!("Failed to write to syslog: {}", e);
                }
            }
            Err(e) => {
                error!("Failed to acquire syslog writer lock: {}", e);
            }
        }
        debug!("Logged audit event: {}", json);
    }

    /// Check if this is a null logger.
    pub fn is_null(&self) -> bool {
        self.writer.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syslog_tag() {
        assert_eq!(SYSLOG_TAG, "SANDBOX_PROBE");
    }

    #[test]
    fn test_null_logger_discards() {
        let logger = AuditLogger::new_null();
        assert!(logger.is_null());

        logger.log(AuditEvent::RunEnd {
            check: "boundary".to_string(),
            passed: true,
            duration_ms: 3,
        });
    }

    #[test]
    fn test_render_includes_timestamp() {
        let json = AuditLogger::render(&AuditEvent::RunStart {
            user: "dev".to_string(),
            check: "egress".to_string(),
            pid: 1,
        })
        .unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["event"], "run_start");
        assert!(value["ts"].is_string());
    }

    #[test]
    #[ignore = "Requires running syslog daemon"]
    fn test_logger_creation() {
        let logger = AuditLogger::new().unwrap();
        assert!(!logger.is_null());

        logger.log(AuditEvent::RunStart {
            user: "test_user".to_string(),
            check: "boundary".to_string(),
            pid: 12345,
        });
    }
}
