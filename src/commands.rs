//! Subcommand handling for sandbox-probe.
//!
//! Each handler prints its human-readable report to stdout, mirrors the
//! result to the audit logger and returns the process exit code.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{debug, info};

use crate::cli::Commands;
use crate::config::HarnessConfig;
use crate::egress::{self, ApiRequest, CustomerRecord, EgressError, EgressOutcome, ProxyConfig};
use crate::probe::{inspect, run_all, standard_probes, RunReport};
use crate::telemetry::{AuditEvent, AuditLogger};

/// Run the selected check.
pub fn handle_command(
    command: &Commands,
    config: &HarnessConfig,
    audit: &AuditLogger,
) -> Result<ExitCode> {
    let check = match command {
        Commands::Boundary => "boundary",
        Commands::Egress(_) => "egress",
    };

    audit.log(AuditEvent::RunStart {
        user: config
            .env
            .user
            .clone()
            .unwrap_or_else(|| "unknown".to_string()),
        check: check.to_string(),
        pid: std::process::id(),
    });

    let started = Instant::now();
    let passed = match command {
        Commands::Boundary => run_boundary(config, audit),
        Commands::Egress(_) => run_egress(config, audit)?,
    };

    audit.log(AuditEvent::RunEnd {
        check: check.to_string(),
        passed,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    });

    Ok(if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Probe the filesystem boundary and print the report.
pub fn run_boundary(config: &HarnessConfig, audit: &AuditLogger) -> bool {
    let report = boundary_report(config);

    for result in report.results() {
        audit.log(AuditEvent::probe_evaluated(result));
    }

    println!("{}", report);
    report.passed()
}

/// Execute every probe and collect the informational inspections.
pub fn boundary_report(config: &HarnessConfig) -> RunReport {
    run_all(standard_probes(&config.boundary))
        .with_inspections(inspect(&config.boundary, &config.env))
}

/// Fetch through the egress proxy and print the result.
///
/// Configuration problems (missing key, malformed proxy URL or origin) are
/// returned as errors before any socket is opened. Request failures are
/// printed and reported as a failed run.
pub fn run_egress(config: &HarnessConfig, audit: &AuditLogger) -> Result<bool> {
    let api_key = config.require_api_key()?;
    let proxy = ProxyConfig::discover(&config.env)?;
    let request = ApiRequest::from_settings(&config.egress, api_key)?;
    debug!("Prepared {:?}", request);

    println!("Testing API through egress proxy...");
    match &proxy {
        Some(proxy) => println!("Proxy: {}", proxy),
        None => println!("Proxy: none"),
    }
    println!("Fetching {} from {}...", config.egress.resource, config.egress.origin);
    println!();

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to create tokio runtime")?;

    let result = runtime.block_on(egress::validate(
        proxy.as_ref(),
        &request,
        config.egress.limit,
        config.egress.timeout,
    ));

    audit.log(AuditEvent::EgressChecked {
        origin: config.egress.origin.clone(),
        proxy: proxy.as_ref().map(ProxyConfig::authority),
        result: match &result {
            Ok(EgressOutcome::NetworkDisabled) => "network_disabled".to_string(),
            Ok(EgressOutcome::Reachable { .. }) => "reachable".to_string(),
            Err(e) => e.kind().to_string(),
        },
    });

    match result {
        Ok(outcome) => {
            info!("Egress check finished: {:?}", outcome);
            print!("{}", render_outcome(&outcome));
            Ok(true)
        }
        Err(err) => {
            eprint!("{}", render_error(&err));
            Ok(false)
        }
    }
}

/// Console text for a successful egress check.
pub fn render_outcome(outcome: &EgressOutcome) -> String {
    let mut out = String::new();

    match outcome {
        EgressOutcome::NetworkDisabled => {
            let _ = writeln!(out, "Network fully disabled: no egress proxy configured");
            let _ = writeln!(out, "No request was sent; direct connections are not attempted.");
        }
        EgressOutcome::Reachable { status, customers } => {
            let _ = writeln!(out, "Status: {}", status);
            let _ = writeln!(out, "Success! Retrieved {} customers", customers.len());
            let _ = writeln!(out);
            out.push_str(&render_customers(customers));
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "Sandbox test complete! request → proxy → external API → parsed response"
            );
        }
    }

    out
}

fn render_customers(customers: &[CustomerRecord]) -> String {
    customers
        .iter()
        .enumerate()
        .map(|(idx, customer)| format!("Customer {}: {}\n", idx + 1, customer))
        .collect()
}

/// Console text for a failed egress check.
pub fn render_error(err: &EgressError) -> String {
    let mut out = format!("Error: {}\n", err);
    if let EgressError::Payload { head, .. } = err {
        let _ = writeln!(out, "Response: {}", head);
    }
    out
}
