//! `dmq validate`: check a job document without opening a session.

use std::path::Path;

use colored::Colorize;
use dmq_core::{DispatchError, Job};
use tracing::info;

use crate::error::Result;

pub async fn execute(input: &Path) -> Result<i32> {
	let raw = tokio::fs::read_to_string(input).await?;
	match Job::from_json(&raw) {
		Ok(job) => {
			info!(target = "dmq", path = %input.display(), "job document is valid");
			let mode = if job.test_mode { " (test mode)" } else { "" };
			println!(
				"{} {} target(s), delay {}s, max {} retries{mode}",
				"valid:".green().bold(),
				job.targets.len(),
				job.delay_seconds,
				job.max_retries
			);
			Ok(0)
		}
		Err(err @ (DispatchError::Validation(_) | DispatchError::Json(_))) => {
			eprintln!("{} {err}", "invalid:".red().bold());
			Ok(1)
		}
		Err(err) => Err(err.into()),
	}
}
