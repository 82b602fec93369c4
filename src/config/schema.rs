//! Configuration file schema.
//!
//! Every field is optional: a config file only names what it overrides, and
//! unset fields fall back to the built-in defaults when the configuration is
//! resolved into a [`HarnessConfig`](super::HarnessConfig).
//!
//! ```toml
//! [boundary]
//! sensitive_tree = "/srv/src/payments"
//! user_home = "/home/builder"
//! extra_denied = ["/var/lib/secrets"]
//!
//! [egress]
//! origin = "https://api.stripe.com"
//! limit = 3
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Filesystem probe targets.
    #[serde(default)]
    pub boundary: BoundaryConfig,

    /// Egress check settings.
    #[serde(default)]
    pub egress: EgressConfig,
}

impl Config {
    /// Merge another config into this one.
    ///
    /// Scalars set in `other` override. Lists are appended.
    pub fn merge(&mut self, other: Config) {
        self.boundary.merge(other.boundary);
        self.egress.merge(other.egress);
    }
}

/// Paths exercised by the boundary probes.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BoundaryConfig {
    /// Sensitive source tree outside the sandbox.
    pub sensitive_tree: Option<PathBuf>,
    /// Parent of the sensitive source tree.
    pub sensitive_parent: Option<PathBuf>,
    /// System-wide user-home root.
    pub home_root: Option<PathBuf>,
    /// A specific user's home directory.
    pub user_home: Option<PathBuf>,
    /// Credential file that must not be readable.
    pub credential_file: Option<PathBuf>,
    /// The sandbox's own scratch directory.
    pub scratch_dir: Option<PathBuf>,
    /// File written inside the scratch directory.
    pub scratch_file: Option<PathBuf>,
    /// Relative traversal path aimed at the sensitive tree.
    pub traversal: Option<PathBuf>,
    /// The harness's own executable or script.
    pub script: Option<PathBuf>,
    /// Dependency-install directory expected next to the harness.
    pub dependency_dir: Option<PathBuf>,
    /// Additional paths that must not be enumerable.
    #[serde(default)]
    pub extra_denied: Vec<PathBuf>,
}

impl BoundaryConfig {
    fn merge(&mut self, other: BoundaryConfig) {
        merge_opt(&mut self.sensitive_tree, other.sensitive_tree);
        merge_opt(&mut self.sensitive_parent, other.sensitive_parent);
        merge_opt(&mut self.home_root, other.home_root);
        merge_opt(&mut self.user_home, other.user_home);
        merge_opt(&mut self.credential_file, other.credential_file);
        merge_opt(&mut self.scratch_dir, other.scratch_dir);
        merge_opt(&mut self.scratch_file, other.scratch_file);
        merge_opt(&mut self.traversal, other.traversal);
        merge_opt(&mut self.script, other.script);
        merge_opt(&mut self.dependency_dir, other.dependency_dir);

        self.extra_denied.extend(other.extra_denied);
    }
}

/// External API reached through the egress proxy.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EgressConfig {
    /// API origin, scheme included.
    pub origin: Option<String>,
    /// Collection path, without query string.
    pub resource: Option<String>,
    /// Maximum number of records requested.
    pub limit: Option<u32>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Environment variable holding the API key.
    pub api_key_var: Option<String>,
}

impl EgressConfig {
    fn merge(&mut self, other: EgressConfig) {
        merge_opt(&mut self.origin, other.origin);
        merge_opt(&mut self.resource, other.resource);
        merge_opt(&mut self.limit, other.limit);
        merge_opt(&mut self.timeout_secs, other.timeout_secs);
        merge_opt(&mut self.api_key_var, other.api_key_var);
    }
}

fn merge_opt<T>(current: &mut Option<T>, other: Option<T>) {
    if other.is_some() {
        *current = other;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_empty() {
        let config = Config::default();

        assert!(config.boundary.sensitive_tree.is_none());
        assert!(config.boundary.extra_denied.is_empty());
        assert!(config.egress.origin.is_none());
        assert!(config.egress.limit.is_none());
    }

    #[test]
    fn test_config_merge_scalars() {
        let mut base = Config {
            egress: EgressConfig {
                limit: Some(3),
                origin: Some("https://api.stripe.com".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let override_config = Config {
            egress: EgressConfig {
                limit: Some(10),
                ..Default::default()
            },
            ..Default::default()
        };

        base.merge(override_config);

        assert_eq!(base.egress.limit, Some(10));
        // Unset scalars leave the base untouched
        assert_eq!(base.egress.origin.as_deref(), Some("https://api.stripe.com"));
    }

    #[test]
    fn test_config_merge_lists() {
        let mut base = Config {
            boundary: BoundaryConfig {
                extra_denied: vec![PathBuf::from("/srv")],
                ..Default::default()
            },
            ..Default::default()
        };
        let override_config = Config {
            boundary: BoundaryConfig {
                extra_denied: vec![PathBuf::from("/var/lib/secrets")],
                ..Default::default()
            },
            ..Default::default()
        };

        base.merge(override_config);

        assert_eq!(
            base.boundary.extra_denied,
            vec![PathBuf::from("/srv"), PathBuf::from("/var/lib/secrets")]
        );
    }

    #[test]
    fn test_config_deserialize() {
        let toml_str = r#"
            [boundary]
            sensitive_tree = "/srv/src/payments"
            extra_denied = ["/root"]

            [egress]
            limit = 5
            api_key_var = "EXAMPLE_KEY"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();

        assert_eq!(
            config.boundary.sensitive_tree,
            Some(PathBuf::from("/srv/src/payments"))
        );
        assert_eq!(config.boundary.extra_denied, vec![PathBuf::from("/root")]);
        assert_eq!(config.egress.limit, Some(5));
        assert_eq!(config.egress.api_key_var.as_deref(), Some("EXAMPLE_KEY"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let toml_str = r#"
            [boundary]
            sensitve_tree = "/typo"
        "#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }
}
