//! Construction of the proxied API request.
//!
//! The request is sent to the proxy over plain HTTP/1.1 with the full external
//! URL as its request target (absolute form) and an explicit `Host` header
//! naming the real origin:
//!
//! ```text
//! GET https://api.stripe.com/v1/customers?limit=3 HTTP/1.1
//! host: api.stripe.com
//! authorization: Bearer sk_test_...
//! ```
//!
//! The proxy routes on that target and host and handles the TLS leg to the
//! origin. Sending an origin-form request directly to the API host would
//! bypass the proxy entirely.

use bytes::Bytes;
use http_body_util::Empty;
use hyper::header::{AUTHORIZATION, HOST};
use hyper::{Method, Request, Uri};
use std::fmt;

use super::error::EgressError;
use crate::config::{ConfigError, EgressSettings};

/// An authenticated GET against an external origin.
#[derive(Clone)]
pub struct ApiRequest {
    /// Absolute URL of the resource.
    url: Uri,
    /// Value of the `Host` header.
    host: String,
    /// Bearer credential.
    api_key: String,
}

impl ApiRequest {
    /// Build a request for `path` on `origin`.
    ///
    /// `origin` must carry a scheme and host and no path; `path` must be
    /// absolute and may include a query.
    pub fn new(origin: &str, path: &str, api_key: impl Into<String>) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            field: "egress.origin".to_string(),
            message,
        };

        let origin_uri: Uri = origin
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| invalid(format!("'{}': {}", origin, e)))?;

        let scheme = match origin_uri.scheme_str() {
            Some(scheme @ ("https" | "http")) => scheme,
            _ => return Err(invalid(format!("'{}' must start with https://", origin))),
        };
        let authority = origin_uri
            .authority()
            .ok_or_else(|| invalid(format!("'{}' has no host", origin)))?;
        if authority.as_str().contains('@') {
            return Err(invalid(format!("'{}' must not embed credentials", origin)));
        }
        if !matches!(origin_uri.path(), "" | "/") || origin_uri.query().is_some() {
            return Err(invalid(format!("'{}' must not include a path", origin)));
        }

        if !path.starts_with('/') {
            return Err(ConfigError::InvalidValue {
                field: "egress.resource".to_string(),
                message: format!("'{}' must start with '/'", path),
            });
        }

        let url: Uri = format!("{}://{}{}", scheme, authority, path)
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| ConfigError::InvalidValue {
                field: "egress.resource".to_string(),
                message: format!("'{}': {}", path, e),
            })?;

        Ok(Self {
            url,
            host: authority.as_str().to_string(),
            api_key: api_key.into(),
        })
    }

    /// Build the request described by the egress settings.
    pub fn from_settings(settings: &EgressSettings, api_key: &str) -> Result<Self, ConfigError> {
        Self::new(&settings.origin, &settings.path(), api_key)
    }

    /// The absolute request target.
    pub fn url(&self) -> &Uri {
        &self.url
    }

    /// The origin host sent in the `Host` header.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Assemble the HTTP request addressed to the proxy.
    pub fn to_http(&self) -> Result<Request<Empty<Bytes>>, EgressError> {
        Request::builder()
            .method(Method::GET)
            .uri(self.url.clone())
            .header(HOST, self.host.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .body(Empty::new())
            .map_err(EgressError::from)
    }
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("url", &self.url)
            .field("host", &self.host)
            .field("api_key", &"<redacted>")
            .finish()
    }
}
