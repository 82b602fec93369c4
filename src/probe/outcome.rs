//! Probe outcomes and verdicts.
//!
//! A probe action never raises; it yields an [`Outcome`]. Whether that outcome
//! is good news depends on the probe's [`Expectation`], and [`evaluate`] is the
//! single pure function that decides.

use nix::errno::Errno;
use serde::Serialize;
use std::fmt;
use std::io;

/// What a probe's action is expected to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expectation {
    /// The action must be denied.
    MustFail,
    /// The action must go through.
    MustSucceed,
}

/// What a probe's action actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The action returned normally, with a description of what it returned.
    Succeeded(String),
    /// The action was refused.
    Failed(FailureDetail),
}

impl Outcome {
    /// Whether the action returned normally.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Succeeded(_))
    }
}

/// Error captured from a failed action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureDetail {
    /// Symbolic errno such as `EACCES`, when the OS reported one.
    pub code: Option<String>,
    /// Human-readable message.
    pub message: String,
}

impl FailureDetail {
    /// Capture an I/O error.
    pub fn from_io(err: &io::Error) -> Self {
        Self {
            code: err
                .raw_os_error()
                .map(|raw| format!("{:?}", Errno::from_raw(raw))),
            message: err.to_string(),
        }
    }

    /// A failure with a message and no errno.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }
}

impl fmt::Display for FailureDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => f.write_str(code),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of comparing an outcome against its expectation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    /// The outcome matched the expectation.
    Pass,
    /// The outcome contradicted the expectation.
    Fail,
}

/// Classification of a probe result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Finding {
    /// A forbidden action was refused.
    AccessDenied,
    /// A permitted action went through.
    Permitted,
    /// A forbidden action went through. This is a security violation.
    UnexpectedAccess,
    /// A permitted action was refused. The sandbox is misconfigured.
    UnexpectedDenial,
}

impl Finding {
    /// Classify an outcome against its expectation.
    pub fn classify(expectation: Expectation, outcome: &Outcome) -> Self {
        match (expectation, outcome.is_success()) {
            (Expectation::MustFail, false) => Finding::AccessDenied,
            (Expectation::MustFail, true) => Finding::UnexpectedAccess,
            (Expectation::MustSucceed, true) => Finding::Permitted,
            (Expectation::MustSucceed, false) => Finding::UnexpectedDenial,
        }
    }

    /// The verdict implied by this finding.
    pub fn verdict(self) -> Verdict {
        match self {
            Finding::AccessDenied | Finding::Permitted => Verdict::Pass,
            Finding::UnexpectedAccess | Finding::UnexpectedDenial => Verdict::Fail,
        }
    }
}

/// Compare an outcome against its expectation.
pub fn evaluate(expectation: Expectation, outcome: &Outcome) -> Verdict {
    Finding::classify(expectation, outcome).verdict()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied() -> Outcome {
        Outcome::Failed(FailureDetail::from_io(&io::Error::from_raw_os_error(
            Errno::EACCES as i32,
        )))
    }

    #[test]
    fn test_verdict_table() {
        let ok = Outcome::Succeeded("3 entries".to_string());

        assert_eq!(evaluate(Expectation::MustFail, &denied()), Verdict::Pass);
        assert_eq!(evaluate(Expectation::MustFail, &ok), Verdict::Fail);
        assert_eq!(evaluate(Expectation::MustSucceed, &ok), Verdict::Pass);
        assert_eq!(evaluate(Expectation::MustSucceed, &denied()), Verdict::Fail);
    }

    #[test]
    fn test_findings() {
        let ok = Outcome::Succeeded(String::new());

        assert_eq!(
            Finding::classify(Expectation::MustFail, &denied()),
            Finding::AccessDenied
        );
        assert_eq!(
            Finding::classify(Expectation::MustFail, &ok),
            Finding::UnexpectedAccess
        );
        assert_eq!(
            Finding::classify(Expectation::MustSucceed, &denied()),
            Finding::UnexpectedDenial
        );
        assert_eq!(Finding::classify(Expectation::MustSucceed, &ok), Finding::Permitted);
    }

    #[test]
    fn test_failure_detail_errno_name() {
        let detail = FailureDetail::from_io(&io::Error::from_raw_os_error(Errno::ENOENT as i32));
        assert_eq!(detail.code.as_deref(), Some("ENOENT"));
        assert_eq!(detail.to_string(), "ENOENT");
    }

    #[test]
    fn test_failure_detail_without_errno() {
        let err = io::Error::new(io::ErrorKind::Other, "synthetic failure");
        let detail = FailureDetail::from_io(&err);
        assert!(detail.code.is_none());
        assert_eq!(detail.to_string(), "synthetic failure");
    }
}
