//! Informational inspections.
//!
//! These describe what the sandbox *does* expose. They are printed with the
//! report but never contribute to the verdict.

use std::fs;
use std::path::Path;

use super::catalog::describe_listing;
use crate::config::{BoundaryTargets, EnvSnapshot};
use crate::egress::redact_credentials;

/// A labelled observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inspection {
    /// What was looked at.
    pub label: String,
    /// What was seen.
    pub value: String,
}

impl Inspection {
    /// Create an inspection.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Gather the informational inspections for a run.
pub fn inspect(targets: &BoundaryTargets, env: &EnvSnapshot) -> Vec<Inspection> {
    let mut inspections = Vec::new();

    let cwd = std::env::current_dir()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|e| format!("unavailable ({})", e));
    inspections.push(Inspection::new("Current directory", cwd));
    inspections.push(Inspection::new("Files in current dir", listing(Path::new("."))));
    inspections.push(Inspection::new(
        format!("Can read own script ({})", targets.script.display()),
        targets.script.exists().to_string(),
    ));
    inspections.push(Inspection::new(
        format!("Has {}", targets.dependency_dir.display()),
        targets.dependency_dir.exists().to_string(),
    ));

    inspections.extend(network_inspections(env));

    inspections.push(Inspection::new(
        format!("Sandboxed {} contents", targets.scratch_dir.display()),
        listing(&targets.scratch_dir),
    ));

    inspections
}

/// Describe the network mode implied by the proxy variables.
pub fn network_inspections(env: &EnvSnapshot) -> Vec<Inspection> {
    let show = |value: &Option<String>| {
        value
            .as_deref()
            .map(redact_credentials)
            .unwrap_or_else(|| "(unset)".to_string())
    };

    if env.proxy_url().is_some() {
        vec![
            Inspection::new("Network", "enabled via proxy only"),
            Inspection::new("HTTP_PROXY", show(&env.http_proxy)),
            Inspection::new("HTTPS_PROXY", show(&env.https_proxy)),
            Inspection::new("Direct external connections", "BLOCKED (must use proxy)"),
        ]
    } else {
        vec![Inspection::new(
            "Network",
            "completely disabled (no HTTP_PROXY or HTTPS_PROXY configured)",
        )]
    }
}

fn listing(path: &Path) -> String {
    match fs::read_dir(path) {
        Ok(entries) => {
            let mut names: Vec<String> = entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect();
            names.sort();
            describe_listing(&names)
        }
        Err(e) => format!("could not read: {}", e),
    }
}
