//! Boundary prober.
//!
//! Runs an ordered list of filesystem probes from inside the sandbox. Each
//! probe declares up front whether its action must be denied or must succeed;
//! the action's result is captured as an [`Outcome`] value and compared
//! against that expectation. The run always completes and ends with an
//! aggregate verdict.
//!
//! # Usage
//!
//! ```ignore
//! use sandbox_probe::probe::{inspect, run_all, standard_probes};
//!
//! let report = run_all(standard_probes(&config.boundary))
//!     .with_inspections(inspect(&config.boundary, &config.env));
//! println!("{report}");
//! std::process::exit(if report.passed() { 0 } else { 1 });
//! ```

pub mod catalog;
pub mod inspect;
pub mod outcome;
pub mod report;
pub mod runner;

pub use catalog::{standard_probes, Probe, ProbeAction, ProbeCategory, SCRATCH_CONTENTS};
pub use inspect::{inspect, network_inspections, Inspection};
pub use outcome::{evaluate, Expectation, FailureDetail, Finding, Outcome, Verdict};
pub use report::{FAIL_GLYPH, PASS_GLYPH};
pub use runner::{run_all, ProbeResult, RunReport};
