//! One-time snapshot of the process environment.
//!
//! The harness reads environment variables exactly once, at startup, and
//! hands the snapshot to the components that need it. Nothing below the
//! command layer calls `std::env::var`.

use std::fmt;

/// Proxy variables consulted in priority order.
pub const PROXY_VARS: [&str; 4] = ["HTTPS_PROXY", "https_proxy", "HTTP_PROXY", "http_proxy"];

/// Environment values relevant to the harness.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct EnvSnapshot {
    /// `HTTPS_PROXY` (or `https_proxy`).
    pub https_proxy: Option<String>,
    /// `HTTP_PROXY` (or `http_proxy`).
    pub http_proxy: Option<String>,
    /// Value of the configured API key variable.
    pub api_key: Option<String>,
    /// Name of the invoking user.
    pub user: Option<String>,
}

impl EnvSnapshot {
    /// Capture the current process environment.
    pub fn capture(api_key_var: &str) -> Self {
        Self::from_lookup(api_key_var, |name| std::env::var(name).ok())
    }

    /// Build a snapshot from an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(api_key_var: &str, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            https_proxy: get("HTTPS_PROXY").or_else(|| get("https_proxy")),
            http_proxy: get("HTTP_PROXY").or_else(|| get("http_proxy")),
            api_key: get(api_key_var),
            user: get("USER").or_else(|| get("LOGNAME")),
        }
    }

    /// The proxy URL to use for egress, HTTPS variable first.
    pub fn proxy_url(&self) -> Option<&str> {
        self.https_proxy
            .as_deref()
            .or(self.http_proxy.as_deref())
    }
}

impl fmt::Debug for EnvSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvSnapshot")
            .field("https_proxy", &self.https_proxy)
            .field("http_proxy", &self.http_proxy)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn snapshot(vars: &[(&str, &str)]) -> EnvSnapshot {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        EnvSnapshot::from_lookup("STRIPE_API_KEY", |name| map.get(name).cloned())
    }

    #[test]
    fn test_https_proxy_preferred() {
        let env = snapshot(&[
            ("HTTP_PROXY", "http://plain:3128"),
            ("HTTPS_PROXY", "http://secure:3128"),
        ]);
        assert_eq!(env.proxy_url(), Some("http://secure:3128"));
    }

    #[test]
    fn test_http_proxy_fallback() {
        let env = snapshot(&[("HTTP_PROXY", "http://plain:3128")]);
        assert_eq!(env.proxy_url(), Some("http://plain:3128"));
    }

    #[test]
    fn test_lowercase_variants() {
        let env = snapshot(&[("https_proxy", "http://lower:8080")]);
        assert_eq!(env.proxy_url(), Some("http://lower:8080"));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env = snapshot(&[("HTTPS_PROXY", ""), ("STRIPE_API_KEY", "  ")]);
        assert!(env.proxy_url().is_none());
        assert!(env.api_key.is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let env = snapshot(&[("STRIPE_API_KEY", "sk_test_secret")]);
        let rendered = format!("{:?}", env);
        assert!(!rendered.contains("sk_test_secret"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn test_user_fallback_to_logname() {
        let env = snapshot(&[("LOGNAME", "builder")]);
        assert_eq!(env.user.as_deref(), Some("builder"));
    }
}
