//! Egress validation through the sandbox's forward proxy.
//!
//! Inside the sandbox the only permitted outbound path is an HTTP proxy
//! advertised through `HTTPS_PROXY`/`HTTP_PROXY`. This module discovers that
//! proxy, sends one authenticated list request through it and checks that
//! the answer is a well-formed record list. The sequence is:
//!
//! 1. [`ProxyConfig::discover`]: no proxy means networking is disabled
//! 2. [`ApiRequest`]: absolute-form GET with `Host` and bearer auth
//! 3. [`validate`]: one request under a deadline, no retries
//! 4. [`parse_customers`]: decode and enforce the record limit

mod client;
mod error;
mod payload;
mod proxy;
mod request;

pub use client::{validate, EgressOutcome};
pub use error::EgressError;
pub use payload::{parse_customers, response_head, CustomerRecord, NO_EMAIL, RESPONSE_HEAD_CHARS};
pub use proxy::{redact_credentials, ProxyConfig, DEFAULT_PROXY_PORT};
pub use request::ApiRequest;
