//! Probe execution and aggregation.

use tracing::{debug, warn};

use super::catalog::{Probe, ProbeCategory};
use super::inspect::Inspection;
use super::outcome::{Finding, Outcome, Verdict};

/// The result of running one probe.
#[derive(Debug, Clone)]
pub struct ProbeResult {
    /// The probe that ran.
    pub probe: Probe,
    /// What the action did.
    pub outcome: Outcome,
    /// Outcome classified against the expectation.
    pub finding: Finding,
    /// Pass or fail.
    pub verdict: Verdict,
}

impl ProbeResult {
    /// Evaluate an outcome for a probe.
    pub fn new(probe: Probe, outcome: Outcome) -> Self {
        let finding = Finding::classify(probe.expectation, &outcome);
        Self {
            probe,
            outcome,
            finding,
            verdict: finding.verdict(),
        }
    }
}

/// Ordered probe results plus informational inspections.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    results: Vec<ProbeResult>,
    inspections: Vec<Inspection>,
}

impl RunReport {
    /// An empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a probe result.
    pub fn push(&mut self, result: ProbeResult) {
        self.results.push(result);
    }

    /// Attach informational inspections. They never affect the verdict.
    pub fn with_inspections(mut self, inspections: Vec<Inspection>) -> Self {
        self.inspections = inspections;
        self
    }

    /// Probe results in execution order.
    pub fn results(&self) -> &[ProbeResult] {
        &self.results
    }

    /// Informational inspections.
    pub fn inspections(&self) -> &[Inspection] {
        &self.inspections
    }

    /// Pass iff every probe passed.
    pub fn verdict(&self) -> Verdict {
        if self.results.iter().all(|r| r.verdict == Verdict::Pass) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }

    /// Whether the overall verdict is Pass.
    pub fn passed(&self) -> bool {
        self.verdict() == Verdict::Pass
    }

    /// Results whose verdict is Fail.
    pub fn failures(&self) -> impl Iterator<Item = &ProbeResult> {
        self.results.iter().filter(|r| r.verdict == Verdict::Fail)
    }

    /// Categories where every denial probe held, in first-seen order.
    pub fn protected_categories(&self) -> Vec<ProbeCategory> {
        let mut categories: Vec<ProbeCategory> = Vec::new();
        for result in &self.results {
            if result.finding == Finding::AccessDenied && !categories.contains(&result.probe.category)
            {
                categories.push(result.probe.category);
            }
        }

        categories.retain(|category| {
            !self
                .results
                .iter()
                .any(|r| r.probe.category == *category && r.verdict == Verdict::Fail)
        });
        categories
    }
}

/// Run every probe in order and collect the results.
///
/// A refused action is recorded as data and the run continues.
pub fn run_all(probes: Vec<Probe>) -> RunReport {
    let mut report = RunReport::new();

    for probe in probes {
        let outcome = probe.action.execute();
        let result = ProbeResult::new(probe, outcome);

        match result.finding {
            Finding::UnexpectedAccess => warn!(
                "Security violation: {} ({:?})",
                result.probe.description, result.outcome
            ),
            Finding::UnexpectedDenial => warn!(
                "Unexpected denial: {} ({:?})",
                result.probe.description, result.outcome
            ),
            _ => debug!(
                "{}: {:?} -> {:?}",
                result.probe.description, result.outcome, result.verdict
            ),
        }

        report.push(result);
    }

    report
}
