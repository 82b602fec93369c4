//! The fixed set of boundary probes.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::outcome::{Expectation, FailureDetail, Outcome};
use crate::config::BoundaryTargets;

/// Contents written by the scratch probe.
pub const SCRATCH_CONTENTS: &str = "sandboxed write";

/// Number of directory entries shown in a success diagnostic.
const LISTING_PREVIEW: usize = 10;

/// What part of the sandbox contract a probe covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProbeCategory {
    /// Source code living outside the sandbox.
    SourceTree,
    /// Host user home directories.
    HomeDirectory,
    /// Credential stores.
    Credentials,
    /// The sandbox's own scratch storage.
    Scratch,
    /// Escapes via relative path traversal.
    Traversal,
    /// Operator-supplied paths.
    Custom,
}

impl ProbeCategory {
    /// Label used in the run summary.
    pub fn label(self) -> &'static str {
        match self {
            ProbeCategory::SourceTree => "source tree",
            ProbeCategory::HomeDirectory => "home directories",
            ProbeCategory::Credentials => "credential files",
            ProbeCategory::Scratch => "scratch storage",
            ProbeCategory::Traversal => "path traversal",
            ProbeCategory::Custom => "custom denied paths",
        }
    }
}

/// A filesystem action with success-or-error semantics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeAction {
    /// Enumerate a directory.
    ListDir(PathBuf),
    /// Read a whole file.
    ReadFile(PathBuf),
    /// Create or overwrite a file.
    WriteFile {
        /// File to write.
        path: PathBuf,
        /// Contents to write.
        contents: String,
    },
}

impl ProbeAction {
    /// Run the action, capturing any error as data.
    pub fn execute(&self) -> Outcome {
        match self {
            ProbeAction::ListDir(path) => list_dir(path),
            ProbeAction::ReadFile(path) => match fs::read(path) {
                // Only the size is reported; the contents may be secret.
                Ok(bytes) => Outcome::Succeeded(format!("read {} bytes", bytes.len())),
                Err(e) => Outcome::Failed(FailureDetail::from_io(&e)),
            },
            ProbeAction::WriteFile { path, contents } => match fs::write(path, contents) {
                Ok(()) => Outcome::Succeeded(format!(
                    "wrote {} bytes to {}",
                    contents.len(),
                    path.display()
                )),
                Err(e) => Outcome::Failed(FailureDetail::from_io(&e)),
            },
        }
    }

    /// The path the action touches.
    pub fn path(&self) -> &Path {
        match self {
            ProbeAction::ListDir(path) | ProbeAction::ReadFile(path) => path,
            ProbeAction::WriteFile { path, .. } => path,
        }
    }
}

fn list_dir(path: &Path) -> Outcome {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => return Outcome::Failed(FailureDetail::from_io(&e)),
    };

    let mut names = Vec::new();
    for entry in entries {
        match entry {
            Ok(entry) => names.push(entry.file_name().to_string_lossy().into_owned()),
            Err(e) => return Outcome::Failed(FailureDetail::from_io(&e)),
        }
    }
    names.sort();

    Outcome::Succeeded(describe_listing(&names))
}

/// Summarize a directory listing for diagnostics.
pub(crate) fn describe_listing(names: &[String]) -> String {
    let shown: Vec<&str> = names
        .iter()
        .take(LISTING_PREVIEW)
        .map(String::as_str)
        .collect();
    let more = names.len().saturating_sub(LISTING_PREVIEW);

    if more > 0 {
        format!(
            "{} entries: [{}, ... {} more]",
            names.len(),
            shown.join(", "),
            more
        )
    } else {
        format!("{} entries: [{}]", names.len(), shown.join(", "))
    }
}

/// A single boundary check with a predeclared expectation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    /// What the probe checks, phrased as the desired behavior.
    pub description: String,
    /// Contract area covered.
    pub category: ProbeCategory,
    /// The action to attempt.
    pub action: ProbeAction,
    /// Whether the action must fail or succeed.
    pub expectation: Expectation,
}

impl Probe {
    /// A probe whose action must be refused.
    pub fn must_fail(
        description: impl Into<String>,
        category: ProbeCategory,
        action: ProbeAction,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            action,
            expectation: Expectation::MustFail,
        }
    }

    /// A probe whose action must go through.
    pub fn must_succeed(
        description: impl Into<String>,
        category: ProbeCategory,
        action: ProbeAction,
    ) -> Self {
        Self {
            description: description.into(),
            category,
            action,
            expectation: Expectation::MustSucceed,
        }
    }
}

/// Build the fixed probe set, followed by any operator-supplied denied paths.
pub fn standard_probes(targets: &BoundaryTargets) -> Vec<Probe> {
    let mut probes = vec![
        Probe::must_fail(
            format!("Block access to {}", targets.sensitive_tree.display()),
            ProbeCategory::SourceTree,
            ProbeAction::ListDir(targets.sensitive_tree.clone()),
        ),
        Probe::must_fail(
            format!("Block access to {} directory", targets.sensitive_parent.display()),
            ProbeCategory::SourceTree,
            ProbeAction::ListDir(targets.sensitive_parent.clone()),
        ),
        Probe::must_fail(
            format!("Block access to {}", targets.home_root.display()),
            ProbeCategory::HomeDirectory,
            ProbeAction::ListDir(targets.home_root.clone()),
        ),
        Probe::must_fail(
            format!("Block access to {}", targets.user_home.display()),
            ProbeCategory::HomeDirectory,
            ProbeAction::ListDir(targets.user_home.clone()),
        ),
        Probe::must_fail(
            format!("Block reading {}", targets.credential_file.display()),
            ProbeCategory::Credentials,
            ProbeAction::ReadFile(targets.credential_file.clone()),
        ),
        Probe::must_succeed(
            format!(
                "Allow writing to {} (sandboxed scratch, isolated from host)",
                targets.scratch_dir.display()
            ),
            ProbeCategory::Scratch,
            ProbeAction::WriteFile {
                path: targets.scratch_file.clone(),
                contents: SCRATCH_CONTENTS.to_string(),
            },
        ),
        Probe::must_fail(
            format!(
                "Block listing parent directories with traversal ({})",
                targets.traversal.display()
            ),
            ProbeCategory::Traversal,
            ProbeAction::ListDir(targets.traversal.clone()),
        ),
    ];

    probes.extend(targets.extra_denied.iter().map(|path| {
        Probe::must_fail(
            format!("Block access to {}", path.display()),
            ProbeCategory::Custom,
            ProbeAction::ListDir(path.clone()),
        )
    }));

    probes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, EnvSnapshot, HarnessConfig};
    use tempfile::tempdir;

    fn default_targets() -> BoundaryTargets {
        let env = EnvSnapshot {
            user: Some("tomchen".to_string()),
            ..Default::default()
        };
        HarnessConfig::resolve(Config::default(), env, None)
            .unwrap()
            .boundary
    }

    #[test]
    fn test_standard_probe_order_and_expectations() {
        let probes = standard_probes(&default_targets());

        let summary: Vec<(&Path, Expectation)> = probes
            .iter()
            .map(|p| (p.action.path(), p.expectation))
            .collect();

        assert_eq!(
            summary,
            vec![
                (Path::new("/pay/src/pay-server"), Expectation::MustFail),
                (Path::new("/pay"), Expectation::MustFail),
                (Path::new("/home"), Expectation::MustFail),
                (Path::new("/home/tomchen"), Expectation::MustFail),
                (Path::new("/etc/shadow"), Expectation::MustFail),
                (Path::new("/tmp/test-sandbox.txt"), Expectation::MustSucceed),
                (Path::new("../../../../pay"), Expectation::MustFail),
            ]
        );
        assert!(matches!(probes[4].action, ProbeAction::ReadFile(_)));
        assert!(matches!(probes[5].action, ProbeAction::WriteFile { .. }));
    }

    #[test]
    fn test_extra_denied_appended() {
        let mut targets = default_targets();
        targets.extra_denied = vec![PathBuf::from("/var/lib/secrets")];

        let probes = standard_probes(&targets);

        assert_eq!(probes.len(), 8);
        let last = probes.last().unwrap();
        assert_eq!(last.category, ProbeCategory::Custom);
        assert_eq!(last.expectation, Expectation::MustFail);
    }

    #[test]
    fn test_list_dir_reports_entries() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "b").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();

        let outcome = ProbeAction::ListDir(dir.path().to_path_buf()).execute();

        assert_eq!(outcome, Outcome::Succeeded("2 entries: [a.txt, b.txt]".to_string()));
    }

    #[test]
    fn test_list_dir_missing_is_failure() {
        let dir = tempdir().unwrap();
        let outcome = ProbeAction::ListDir(dir.path().join("absent")).execute();

        match outcome {
            Outcome::Failed(detail) => assert_eq!(detail.code.as_deref(), Some("ENOENT")),
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[test]
    fn test_read_file_reports_size_only() {
        let dir = tempdir().unwrap();
        let secret = dir.path().join("shadow");
        fs::write(&secret, "root:$6$hash").unwrap();

        let outcome = ProbeAction::ReadFile(secret).execute();

        assert_eq!(outcome, Outcome::Succeeded("read 12 bytes".to_string()));
    }

    #[test]
    fn test_write_file_overwrites() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test-sandbox.txt");
        let action = ProbeAction::WriteFile {
            path: path.clone(),
            contents: SCRATCH_CONTENTS.to_string(),
        };

        assert!(action.execute().is_success());
        assert!(action.execute().is_success());
        assert_eq!(fs::read_to_string(path).unwrap(), SCRATCH_CONTENTS);
    }

    #[test]
    fn test_describe_listing_truncates() {
        let names: Vec<String> = (0..12).map(|i| format!("f{:02}", i)).collect();
        let text = describe_listing(&names);
        assert!(text.starts_with("12 entries: [f00, f01"));
        assert!(text.ends_with("... 2 more]"));
    }
}
