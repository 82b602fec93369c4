//! Decoding and validation of the API response.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Deserialize;
use std::fmt;

use super::error::EgressError;

/// How much of a raw body to include in payload diagnostics.
pub const RESPONSE_HEAD_CHARS: usize = 200;

/// Placeholder printed for records without an email.
pub const NO_EMAIL: &str = "no email";

#[derive(Debug, Deserialize)]
struct ListEnvelope {
    data: Vec<RawCustomer>,
}

#[derive(Debug, Deserialize)]
struct RawCustomer {
    id: String,
    #[serde(default)]
    email: Option<String>,
    created: i64,
}

/// A validated customer record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerRecord {
    /// Record identifier.
    pub id: String,
    /// Email, if the record has a non-empty one.
    pub email: Option<String>,
    /// Creation time.
    pub created: DateTime<Utc>,
}

impl CustomerRecord {
    /// The email, or the `no email` placeholder.
    pub fn email_or_placeholder(&self) -> &str {
        self.email.as_deref().unwrap_or(NO_EMAIL)
    }

    /// Creation time as ISO-8601 with millisecond precision, e.g.
    /// `2024-01-15T09:30:00.000Z`.
    pub fn created_iso(&self) -> String {
        self.created.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

impl fmt::Display for CustomerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{ id: {}, email: {}, created: {} }}",
            self.id,
            self.email_or_placeholder(),
            self.created_iso()
        )
    }
}

/// Decode a list response, enforcing the record limit.
pub fn parse_customers(
    status: u16,
    body: &[u8],
    limit: u32,
) -> Result<Vec<CustomerRecord>, EgressError> {
    let payload_error = |message: String| EgressError::Payload {
        status,
        message,
        head: response_head(body),
    };

    let envelope: ListEnvelope =
        serde_json::from_slice(body).map_err(|e| payload_error(e.to_string()))?;

    if envelope.data.len() > limit as usize {
        return Err(payload_error(format!(
            "received {} records, more than the requested limit of {}",
            envelope.data.len(),
            limit
        )));
    }

    envelope
        .data
        .into_iter()
        .map(|raw| {
            let created = DateTime::<Utc>::from_timestamp(raw.created, 0).ok_or_else(|| {
                payload_error(format!(
                    "record {} has out-of-range created timestamp {}",
                    raw.id, raw.created
                ))
            })?;

            Ok(CustomerRecord {
                id: raw.id,
                email: raw.email.filter(|e| !e.is_empty()),
                created,
            })
        })
        .collect()
}

/// The first [`RESPONSE_HEAD_CHARS`] characters of a body, lossily decoded.
pub fn response_head(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(RESPONSE_HEAD_CHARS)
        .collect()
}
