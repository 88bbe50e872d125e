//! `dmq run`: execute a job end to end and write the report.

use std::path::Path;

use colored::Colorize;
use dmq_core::{Job, Orchestrator, RunResult, TargetStatus, cancel_pair};
use tracing::{info, warn};

use crate::error::Result;
use crate::progress::TerminalSink;
use crate::session::{DriverSession, NullSession};

pub async fn execute(input: &Path, output: Option<&Path>, driver_url: &str) -> Result<i32> {
	let raw = tokio::fs::read_to_string(input).await?;
	let job = Job::from_json(&raw)?;

	let (handle, token) = cancel_pair();
	tokio::spawn(async move {
		if tokio::signal::ctrl_c().await.is_ok() {
			warn!(target = "dmq", "interrupt received; finalizing report and shutting down");
			handle.cancel();
		}
	});

	let sink = TerminalSink::new();
	let orchestrator = Orchestrator::new();
	let report = if job.test_mode {
		orchestrator.run(&job, NullSession::default(), &sink, token).await
	} else {
		orchestrator.run(&job, DriverSession::new(driver_url)?, &sink, token).await
	};

	print_summary(&report);

	match output.or(job.output_path.as_deref()) {
		Some(path) => {
			let encoded = serde_json::to_string_pretty(&report)?;
			tokio::fs::write(path, encoded).await?;
			info!(target = "dmq", path = %path.display(), "report written");
		}
		None => println!("{}", serde_json::to_string_pretty(&report)?),
	}

	// 0: everything sent; 1: at least one delivery failed; 3: the run was
	// cut short (driver down, auth invalidated, interrupt) and targets were
	// skipped without a single failure. Lets scripts tell the cases apart.
	Ok(if report.total_failed > 0 {
		1
	} else if report.total_skipped > 0 {
		3
	} else {
		0
	})
}

fn print_summary(report: &RunResult) {
	eprintln!();
	eprintln!("{}", "run summary".bold());
	for result in &report.results {
		let status = match result.status {
			TargetStatus::Sent => "sent".green(),
			TargetStatus::Failed => "failed".red(),
			TargetStatus::Skipped => "skipped".yellow(),
		};
		match &result.error {
			Some(error) => eprintln!("  {:<24} {status}  {error}", result.target),
			None => eprintln!("  {:<24} {status}", result.target),
		}
	}
	eprintln!(
		"  {} sent, {} failed, {} skipped in {:.1}s",
		report.total_sent, report.total_failed, report.total_skipped, report.duration_seconds
	);
}
