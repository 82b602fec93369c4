//! Audit event types for structured logging.
//!
//! These events are logged to syslog with the `SANDBOX_PROBE` tag when
//! `--syslog` is given.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::probe::{Expectation, Finding, Outcome, ProbeResult, Verdict};

/// Audit events for a probe run.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AuditEvent {
    /// A check started.
    RunStart {
        /// Username from the environment snapshot.
        user: String,
        /// Which check is running (`boundary` or `egress`).
        check: String,
        /// Process ID of the probe.
        pid: u32,
    },

    /// A single boundary probe was executed and judged.
    ProbeEvaluated {
        /// Probe description.
        description: String,
        /// Category label.
        category: String,
        /// What the probe expected.
        expectation: Expectation,
        /// How the outcome was classified.
        finding: Finding,
        /// Pass or fail.
        verdict: Verdict,
        /// Error code or success summary.
        detail: String,
    },

    /// The egress request finished.
    EgressChecked {
        /// Origin that was requested.
        origin: String,
        /// Proxy authority, if one was configured.
        proxy: Option<String>,
        /// `network_disabled`, `reachable`, or the error kind.
        result: String,
    },

    /// A check finished.
    RunEnd {
        /// Which check ran.
        check: String,
        /// Aggregate result.
        passed: bool,
        /// Wall-clock duration in milliseconds.
        duration_ms: u64,
    },
}

impl AuditEvent {
    /// Build a `ProbeEvaluated` event from a judged probe.
    pub fn probe_evaluated(result: &ProbeResult) -> Self {
        let detail = match &result.outcome {
            Outcome::Succeeded(summary) => summary.clone(),
            Outcome::Failed(detail) => detail.to_string(),
        };

        AuditEvent::ProbeEvaluated {
            description: result.probe.description.clone(),
            category: result.probe.category.label().to_string(),
            expectation: result.probe.expectation,
            finding: result.finding,
            verdict: result.verdict,
            detail,
        }
    }

    /// Wrap this event with a timestamp for serialization.
    pub fn with_timestamp(&self) -> TimestampedEvent<'_> {
        TimestampedEvent {
            timestamp: Utc::now(),
            event: self,
        }
    }
}

/// Wrapper for serializing events with timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TimestampedEvent<'a> {
    /// ISO8601 timestamp.
    #[serde(rename = "ts")]
    pub timestamp: DateTime<Utc>,

    /// The event, flattened into this struct.
    #[serde(flatten)]
    pub event: &'a AuditEvent,
}
