//! sandbox-probe: verification harness for execution sandboxes
//!
//! Runs from inside a sandbox and checks, from the inside, that the sandbox
//! actually enforces what it promises.
//!
//! # Checks
//!
//! - **Boundary**: a fixed sequence of filesystem probes, each declaring
//!   whether it must be denied or must succeed, with an aggregate verdict
//! - **Egress**: one authenticated request through the forward proxy named
//!   by `HTTPS_PROXY`/`HTTP_PROXY`, validating the decoded payload
//!
//! # Architecture
//!
//! - **Config**: hierarchical TOML plus CLI overrides, resolved once into a
//!   [`config::HarnessConfig`] together with an environment snapshot
//! - **Probe**: probe catalog, runner and console report
//! - **Egress**: proxy discovery, request construction and response decoding
//! - **Telemetry**: optional syslog audit trail

#![warn(clippy::all)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod egress;
pub mod probe;
pub mod telemetry;
