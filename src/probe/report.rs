//! Human-readable rendering of a [`RunReport`].

use std::fmt;

use super::outcome::{Finding, Outcome};
use super::runner::{ProbeResult, RunReport};

/// Glyph for results that matched expectations.
pub const PASS_GLYPH: &str = "✓";
/// Glyph for results that did not.
pub const FAIL_GLYPH: &str = "✗";

impl fmt::Display for ProbeResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let glyph = match self.finding {
            Finding::AccessDenied | Finding::Permitted => PASS_GLYPH,
            Finding::UnexpectedAccess | Finding::UnexpectedDenial => FAIL_GLYPH,
        };
        writeln!(f, "{} {}", glyph, self.probe.description)?;

        match (&self.finding, &self.outcome) {
            (Finding::AccessDenied, Outcome::Failed(detail)) => {
                writeln!(f, "  Blocked: {}", detail)
            }
            (Finding::Permitted, Outcome::Succeeded(value)) => {
                writeln!(f, "  Accessible inside the sandbox (does not affect host): {}", value)
            }
            (Finding::UnexpectedAccess, Outcome::Succeeded(value)) => {
                writeln!(f, "  SECURITY ISSUE: Access succeeded!")?;
                writeln!(f, "  Result: {}", value)
            }
            (Finding::UnexpectedDenial, Outcome::Failed(detail)) => {
                writeln!(f, "  UNEXPECTED DENIAL: {}", detail.message)
            }
            // Finding is derived from the outcome, the remaining pairs cannot occur.
            (_, outcome) => writeln!(f, "  {:?}", outcome),
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Testing Sandbox Security Boundaries ===")?;
        writeln!(f)?;
        writeln!(f, "File System Access Tests:")?;

        for result in self.results() {
            writeln!(f)?;
            write!(f, "{}", result)?;
        }

        if !self.inspections().is_empty() {
            writeln!(f)?;
            writeln!(f, "--- What IS Accessible ---")?;
            writeln!(f)?;
            for inspection in self.inspections() {
                writeln!(f, "  {}: {}", inspection.label, inspection.value)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "=== Security Test Summary ===")?;
        writeln!(f)?;

        if self.passed() {
            writeln!(f, "{} All critical security boundaries enforced", PASS_GLYPH)?;
            let protected: Vec<&str> = self
                .protected_categories()
                .into_iter()
                .map(|c| c.label())
                .collect();
            if !protected.is_empty() {
                writeln!(f, "{} Protected: {}", PASS_GLYPH, protected.join(", "))?;
            }
            writeln!(f, "{} Sandbox isolation is working correctly", PASS_GLYPH)
        } else {
            let failed = self.failures().count();
            writeln!(
                f,
                "{} WARNING: {} of {} boundary checks did not hold!",
                FAIL_GLYPH,
                failed,
                self.results().len()
            )?;
            for result in self.failures() {
                writeln!(f, "{}   - {}", FAIL_GLYPH, result.probe.description)?;
            }
            writeln!(f, "{} Review the failures above", FAIL_GLYPH)
        }
    }
}
