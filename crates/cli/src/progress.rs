//! Colored terminal rendering of orchestrator progress.

use colored::Colorize;
use dmq_core::{ProgressEvent, ProgressSink};

/// Prints one line per event to stderr, keeping stdout clean for reports.
#[derive(Debug, Default)]
pub struct TerminalSink;

impl TerminalSink {
	pub fn new() -> Self {
		Self
	}
}

impl ProgressSink for TerminalSink {
	fn on_event(&self, event: &ProgressEvent<'_>) {
		match event {
			ProgressEvent::RunStarted { total, test_mode } => {
				let suffix = if *test_mode { " (test mode)" } else { "" };
				eprintln!("{} dispatching to {total} target(s){suffix}", "run".cyan().bold());
			}
			ProgressEvent::AttemptStarted {
				target,
				index,
				total,
				attempt,
			} => {
				if *attempt == 1 {
					eprintln!("  [{}/{total}] @{target}", index + 1);
				} else {
					eprintln!("  [{}/{total}] @{target} (attempt {attempt})", index + 1);
				}
			}
			ProgressEvent::TargetSent {
				target, test_mode: true, ..
			} => {
				eprintln!("    {} @{target} (test)", "sent".green());
			}
			ProgressEvent::TargetSent { target, .. } => {
				eprintln!("    {} @{target}", "sent".green());
			}
			ProgressEvent::TargetFailed { target, attempts, kind } => {
				eprintln!("    {} @{target} after {attempts} attempt(s): {kind}", "failed".red());
			}
			ProgressEvent::TargetSkipped { target } => {
				eprintln!("    {} @{target}", "skipped".yellow());
			}
			ProgressEvent::RunFinished { sent, failed, skipped } => {
				eprintln!("{} {sent} sent, {failed} failed, {skipped} skipped", "done".cyan().bold());
			}
		}
	}
}
