//! Audit logging for probe runs.
//!
//! Two separate channels:
//!
//! - **Diagnostics** (tracing): go to stderr, filtered by `-v` / `RUST_LOG`
//! - **Audit** (syslog): opt-in with `--syslog`, one JSON line per event
//!
//! The console report printed by each command is independent of both.
//!
//! # Event Format
//!
//! ```json
//! {"ts":"2026-01-07T14:32:01Z","event":"probe_evaluated","description":"Reading /etc/shadow","category":"credential files","expectation":"must_fail","finding":"access_denied","verdict":"pass","detail":"EACCES"}
//! ```

mod error;
mod events;
mod syslog;

pub use error::TelemetryError;
pub use events::{AuditEvent, TimestampedEvent};
pub use syslog::{AuditLogger, SYSLOG_TAG};
