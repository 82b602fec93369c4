//! Proxy discovery from the environment snapshot.

use hyper::Uri;
use std::fmt;

use crate::config::{ConfigError, EnvSnapshot};

/// Default port when the proxy URL names none.
pub const DEFAULT_PROXY_PORT: u16 = 80;

/// Where the egress proxy listens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    /// Hostname or IP address, without IPv6 brackets.
    pub host: String,
    /// TCP port.
    pub port: u16,
}

impl ProxyConfig {
    /// Discover the proxy from the environment snapshot.
    ///
    /// `Ok(None)` means no proxy is configured, which is a valid state.
    pub fn discover(env: &EnvSnapshot) -> Result<Option<Self>, ConfigError> {
        env.proxy_url().map(Self::parse).transpose()
    }

    /// Parse a proxy URL such as `http://10.0.0.1:3128`.
    ///
    /// A bare `host:port` is treated as `http://host:port`. Only plain HTTP
    /// proxies are supported; the hop to the proxy is never TLS.
    pub fn parse(url: &str) -> Result<Self, ConfigError> {
        let invalid = |message: &str| ConfigError::InvalidProxyUrl {
            url: redact_credentials(url),
            message: message.to_string(),
        };

        let normalized = if url.contains("://") {
            url.to_string()
        } else {
            format!("http://{}", url)
        };

        let uri: Uri = normalized
            .parse()
            .map_err(|e: hyper::http::uri::InvalidUri| invalid(&e.to_string()))?;

        match uri.scheme_str() {
            Some("http") => {}
            Some(other) => {
                return Err(invalid(&format!(
                    "unsupported scheme '{}', expected http",
                    other
                )));
            }
            None => return Err(invalid("missing scheme")),
        }

        let host = uri
            .host()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| invalid("missing host"))?;
        let host = host
            .strip_prefix('[')
            .and_then(|h| h.strip_suffix(']'))
            .unwrap_or(host)
            .to_string();

        Ok(Self {
            host,
            port: uri.port_u16().unwrap_or(DEFAULT_PROXY_PORT),
        })
    }

    /// `host:port`, bracketing IPv6 literals.
    pub fn authority(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl fmt::Display for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.authority())
    }
}

/// Replace any userinfo in a URL with `***`.
pub fn redact_credentials(url: &str) -> String {
    let (scheme, rest) = match url.split_once("://") {
        Some((scheme, rest)) => (Some(scheme), rest),
        None => (None, url),
    };

    let authority_end = rest.find('/').unwrap_or(rest.len());
    let (authority, tail) = rest.split_at(authority_end);
    let authority = match authority.rsplit_once('@') {
        Some((_, host)) => format!("***@{}", host),
        None => authority.to_string(),
    };

    match scheme {
        Some(scheme) => format!("{}://{}{}", scheme, authority, tail),
        None => format!("{}{}", authority, tail),
    }
}
