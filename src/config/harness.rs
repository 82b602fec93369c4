//! Resolved harness configuration.
//!
//! [`HarnessConfig`] is built once at startup from the merged [`Config`] and
//! the environment snapshot, then passed by reference to both components.

use std::path::PathBuf;
use std::time::Duration;

use super::env::EnvSnapshot;
use super::error::ConfigError;
use super::schema::{BoundaryConfig, Config, EgressConfig};

/// Default sensitive source tree.
pub const DEFAULT_SENSITIVE_TREE: &str = "/pay/src/pay-server";
/// Default parent of the sensitive source tree.
pub const DEFAULT_SENSITIVE_PARENT: &str = "/pay";
/// Default user-home root.
pub const DEFAULT_HOME_ROOT: &str = "/home";
/// Default credential file.
pub const DEFAULT_CREDENTIAL_FILE: &str = "/etc/shadow";
/// Default scratch directory.
pub const DEFAULT_SCRATCH_DIR: &str = "/tmp";
/// Default scratch file written by the write probe.
pub const DEFAULT_SCRATCH_FILE: &str = "/tmp/test-sandbox.txt";
/// Default traversal path.
pub const DEFAULT_TRAVERSAL: &str = "../../../../pay";
/// Default dependency-install directory.
pub const DEFAULT_DEPENDENCY_DIR: &str = "node_modules";

/// Default external API origin.
pub const DEFAULT_ORIGIN: &str = "https://api.stripe.com";
/// Default collection path.
pub const DEFAULT_RESOURCE: &str = "/v1/customers";
/// Default record limit.
pub const DEFAULT_LIMIT: u32 = 3;
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default API key variable.
pub const DEFAULT_API_KEY_VAR: &str = "STRIPE_API_KEY";

/// Complete, validated configuration for one run.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Filesystem probe targets.
    pub boundary: BoundaryTargets,
    /// Egress check settings.
    pub egress: EgressSettings,
    /// Environment captured at startup.
    pub env: EnvSnapshot,
}

/// Filesystem paths probed by the boundary check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundaryTargets {
    /// Sensitive source tree outside the sandbox.
    pub sensitive_tree: PathBuf,
    /// Parent of the sensitive source tree.
    pub sensitive_parent: PathBuf,
    /// System-wide user-home root.
    pub home_root: PathBuf,
    /// A specific user's home directory.
    pub user_home: PathBuf,
    /// Credential file.
    pub credential_file: PathBuf,
    /// Scratch directory owned by the sandbox.
    pub scratch_dir: PathBuf,
    /// File written by the scratch probe.
    pub scratch_file: PathBuf,
    /// Relative traversal path.
    pub traversal: PathBuf,
    /// The harness's own executable or script.
    pub script: PathBuf,
    /// Dependency-install directory.
    pub dependency_dir: PathBuf,
    /// Additional operator-supplied MustFail paths.
    pub extra_denied: Vec<PathBuf>,
}

/// Settings for the egress check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EgressSettings {
    /// API origin, e.g. `https://api.stripe.com`.
    pub origin: String,
    /// Collection path without query.
    pub resource: String,
    /// Maximum records requested.
    pub limit: u32,
    /// Whole-request timeout.
    pub timeout: Duration,
    /// Environment variable holding the API key.
    pub api_key_var: String,
}

impl EgressSettings {
    /// Request path including the limit query parameter.
    pub fn path(&self) -> String {
        format!("{}?limit={}", self.resource, self.limit)
    }
}

impl HarnessConfig {
    /// Resolve a merged config against the live process environment.
    pub fn from_config(config: Config) -> Result<Self, ConfigError> {
        let api_key_var = api_key_var(&config.egress);
        let env = EnvSnapshot::capture(&api_key_var);
        let current_exe = std::env::current_exe().ok();
        Self::resolve(config, env, current_exe)
    }

    /// Resolve a merged config against an explicit environment snapshot.
    pub fn resolve(
        config: Config,
        env: EnvSnapshot,
        current_exe: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let boundary = resolve_boundary(config.boundary, &env, current_exe);
        let egress = resolve_egress(config.egress)?;

        Ok(Self {
            boundary,
            egress,
            env,
        })
    }

    /// The API key, or the fatal configuration error naming its variable.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.env
            .api_key
            .as_deref()
            .ok_or_else(|| ConfigError::Missing {
                variable: self.egress.api_key_var.clone(),
            })
    }
}

fn api_key_var(egress: &EgressConfig) -> String {
    egress
        .api_key_var
        .clone()
        .unwrap_or_else(|| DEFAULT_API_KEY_VAR.to_string())
}

fn resolve_boundary(
    boundary: BoundaryConfig,
    env: &EnvSnapshot,
    current_exe: Option<PathBuf>,
) -> BoundaryTargets {
    let home_root = boundary
        .home_root
        .unwrap_or_else(|| PathBuf::from(DEFAULT_HOME_ROOT));
    let user_home = boundary.user_home.unwrap_or_else(|| {
        home_root.join(env.user.as_deref().unwrap_or("nobody"))
    });

    BoundaryTargets {
        sensitive_tree: boundary
            .sensitive_tree
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SENSITIVE_TREE)),
        sensitive_parent: boundary
            .sensitive_parent
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SENSITIVE_PARENT)),
        home_root,
        user_home,
        credential_file: boundary
            .credential_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CREDENTIAL_FILE)),
        scratch_dir: boundary
            .scratch_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_DIR)),
        scratch_file: boundary
            .scratch_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCRATCH_FILE)),
        traversal: boundary
            .traversal
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TRAVERSAL)),
        script: boundary
            .script
            .or(current_exe)
            .unwrap_or_else(|| PathBuf::from("sandbox-probe")),
        dependency_dir: boundary
            .dependency_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DEPENDENCY_DIR)),
        extra_denied: boundary.extra_denied,
    }
}

fn resolve_egress(egress: EgressConfig) -> Result<EgressSettings, ConfigError> {
    let api_key_var = api_key_var(&egress);

    let limit = egress.limit.unwrap_or(DEFAULT_LIMIT);
    if limit == 0 {
        return Err(ConfigError::InvalidValue {
            field: "egress.limit".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let timeout_secs = egress.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidValue {
            field: "egress.timeout_secs".to_string(),
            message: "must be at least 1".to_string(),
        });
    }

    let resource = egress
        .resource
        .unwrap_or_else(|| DEFAULT_RESOURCE.to_string());
    if !resource.starts_with('/') || resource.contains('?') {
        return Err(ConfigError::InvalidValue {
            field: "egress.resource".to_string(),
            message: format!("'{}' must be an absolute path without a query", resource),
        });
    }

    Ok(EgressSettings {
        origin: egress.origin.unwrap_or_else(|| DEFAULT_ORIGIN.to_string()),
        resource,
        limit,
        timeout: Duration::from_secs(timeout_secs),
        api_key_var,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with_user(user: &str) -> EnvSnapshot {
        EnvSnapshot {
            user: Some(user.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config =
            HarnessConfig::resolve(Config::default(), env_with_user("tomchen"), None).unwrap();

        assert_eq!(config.boundary.sensitive_tree, PathBuf::from("/pay/src/pay-server"));
        assert_eq!(config.boundary.sensitive_parent, PathBuf::from("/pay"));
        assert_eq!(config.boundary.user_home, PathBuf::from("/home/tomchen"));
        assert_eq!(config.boundary.credential_file, PathBuf::from("/etc/shadow"));
        assert_eq!(config.boundary.scratch_file, PathBuf::from("/tmp/test-sandbox.txt"));
        assert_eq!(config.boundary.traversal, PathBuf::from("../../../../pay"));
        assert_eq!(config.egress.path(), "/v1/customers?limit=3");
        assert_eq!(config.egress.timeout, Duration::from_secs(10));
        assert_eq!(config.egress.api_key_var, "STRIPE_API_KEY");
    }

    #[test]
    fn test_user_home_follows_home_root() {
        let config = Config {
            boundary: BoundaryConfig {
                home_root: Some(PathBuf::from("/users")),
                ..Default::default()
            },
            ..Default::default()
        };

        let resolved = HarnessConfig::resolve(config, env_with_user("ana"), None).unwrap();
        assert_eq!(resolved.boundary.user_home, PathBuf::from("/users/ana"));
    }

    #[test]
    fn test_script_prefers_config_then_current_exe() {
        let exe = Some(PathBuf::from("/box/bin/sandbox-probe"));
        let resolved =
            HarnessConfig::resolve(Config::default(), EnvSnapshot::default(), exe).unwrap();
        assert_eq!(resolved.boundary.script, PathBuf::from("/box/bin/sandbox-probe"));

        let config = Config {
            boundary: BoundaryConfig {
                script: Some(PathBuf::from("script.js")),
                ..Default::default()
            },
            ..Default::default()
        };
        let resolved = HarnessConfig::resolve(
            config,
            EnvSnapshot::default(),
            Some(PathBuf::from("/ignored")),
        )
        .unwrap();
        assert_eq!(resolved.boundary.script, PathBuf::from("script.js"));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let config = Config {
            egress: EgressConfig {
                limit: Some(0),
                ..Default::default()
            },
            ..Default::default()
        };

        let err = HarnessConfig::resolve(config, EnvSnapshot::default(), None).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "egress.limit"));
    }

    #[test]
    fn test_resource_with_query_rejected() {
        let config = Config {
            egress: EgressConfig {
                resource: Some("/v1/customers?limit=9".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };

        assert!(HarnessConfig::resolve(config, EnvSnapshot::default(), None).is_err());
    }

    #[test]
    fn test_require_api_key() {
        let config =
            HarnessConfig::resolve(Config::default(), EnvSnapshot::default(), None).unwrap();
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, ConfigError::Missing { ref variable } if variable == "STRIPE_API_KEY"));

        let env = EnvSnapshot {
            api_key: Some("sk_test_123".to_string()),
            ..Default::default()
        };
        let config = HarnessConfig::resolve(Config::default(), env, None).unwrap();
        assert_eq!(config.require_api_key().unwrap(), "sk_test_123");
    }
}
