//! Error types for the egress check.
//!
//! Transport failures, timeouts and payload failures are distinct terminal
//! states; none of them is retried.

use std::time::Duration;
use thiserror::Error;

/// Errors from a single egress request.
#[derive(Debug, Error)]
pub enum EgressError {
    /// The proxy could not be reached or the HTTP exchange broke down.
    #[error("Transport error via proxy {proxy}: {message}")]
    Transport {
        /// Proxy authority that was dialed.
        proxy: String,
        /// Underlying cause.
        message: String,
    },

    /// The request did not complete within the deadline and was aborted.
    #[error("Request timeout after {}s", after.as_secs_f32())]
    Timeout {
        /// The deadline that expired.
        after: Duration,
    },

    /// The response arrived but is not the expected payload.
    #[error("Failed to parse response (status {status}): {message}")]
    Payload {
        /// HTTP status of the response.
        status: u16,
        /// What was wrong with it.
        message: String,
        /// The start of the raw body, for debugging.
        head: String,
    },

    /// The request itself could not be assembled.
    #[error("Failed to build request: {0}")]
    Request(#[from] hyper::http::Error),
}

impl EgressError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            EgressError::Transport { .. } => "transport_error",
            EgressError::Timeout { .. } => "timeout",
            EgressError::Payload { .. } => "payload_error",
            EgressError::Request(_) => "request_error",
        }
    }
}
