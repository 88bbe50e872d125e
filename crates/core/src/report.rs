//! Run result model and the append-only recorder.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorKind, SessionError};

/// Final disposition of one target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetStatus {
	Sent,
	Failed,
	Skipped,
}

impl std::fmt::Display for TargetStatus {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			TargetStatus::Sent => write!(f, "Sent"),
			TargetStatus::Failed => write!(f, "Failed"),
			TargetStatus::Skipped => write!(f, "Skipped"),
		}
	}
}

/// Outcome of a single attempt; skipped targets record no attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttemptStatus {
	Sent,
	Failed,
}

/// Result of one send attempt against one target.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptOutcome {
	/// 1-based attempt number.
	pub attempt: u32,
	pub outcome: AttemptStatus,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error_kind: Option<ErrorKind>,
	pub timestamp: DateTime<Utc>,
}

impl AttemptOutcome {
	pub fn sent(attempt: u32) -> Self {
		Self {
			attempt,
			outcome: AttemptStatus::Sent,
			error_kind: None,
			timestamp: Utc::now(),
		}
	}

	pub fn failed(attempt: u32, kind: ErrorKind) -> Self {
		Self {
			attempt,
			outcome: AttemptStatus::Failed,
			error_kind: Some(kind),
			timestamp: Utc::now(),
		}
	}
}

/// Final disposition of one target after all attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetResult {
	pub target: String,
	pub status: TargetStatus,
	/// The rendered text delivered (or attempted); empty when skipped.
	pub message: String,
	/// Wall-clock time of the final attempt, or of the skip decision.
	pub timestamp: DateTime<Utc>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
	#[serde(default, skip_serializing_if = "Vec::is_empty")]
	pub attempts: Vec<AttemptOutcome>,
	pub processing_time_ms: u64,
}

impl TargetResult {
	pub fn sent(target: &str, message: &str, attempts: Vec<AttemptOutcome>, elapsed: Duration) -> Self {
		Self {
			target: target.to_string(),
			status: TargetStatus::Sent,
			message: message.to_string(),
			timestamp: Utc::now(),
			error: None,
			attempts,
			processing_time_ms: elapsed.as_millis() as u64,
		}
	}

	pub fn failed(target: &str, message: &str, attempts: Vec<AttemptOutcome>, elapsed: Duration, error: &SessionError) -> Self {
		Self {
			target: target.to_string(),
			status: TargetStatus::Failed,
			message: message.to_string(),
			timestamp: Utc::now(),
			error: Some(error.to_string()),
			attempts,
			processing_time_ms: elapsed.as_millis() as u64,
		}
	}

	pub fn skipped(target: &str) -> Self {
		Self {
			target: target.to_string(),
			status: TargetStatus::Skipped,
			message: String::new(),
			timestamp: Utc::now(),
			error: None,
			attempts: Vec::new(),
			processing_time_ms: 0,
		}
	}
}

/// The final, immutable record of one run.
///
/// `total_attempted` counts targets that reached at least one attempt, so
/// `total_attempted == total_sent + total_failed` and skipped targets only
/// appear in `total_skipped`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResult {
	pub total_attempted: usize,
	pub total_sent: usize,
	pub total_failed: usize,
	pub total_skipped: usize,
	pub started_at: DateTime<Utc>,
	pub finished_at: DateTime<Utc>,
	pub duration_seconds: f64,
	/// One entry per job target, in input order.
	pub results: Vec<TargetResult>,
}

/// Accumulates per-target results during a run; consumed by [`finalize`].
///
/// Append-only: results land in dispatch order and are never revisited.
///
/// [`finalize`]: Recorder::finalize
#[derive(Debug)]
pub struct Recorder {
	started_at: DateTime<Utc>,
	results: Vec<TargetResult>,
}

impl Recorder {
	pub fn new(capacity: usize) -> Self {
		Self {
			started_at: Utc::now(),
			results: Vec::with_capacity(capacity),
		}
	}

	pub fn record(&mut self, result: TargetResult) {
		self.results.push(result);
	}

	/// Number of targets with a recorded disposition so far.
	pub fn len(&self) -> usize {
		self.results.len()
	}

	pub fn is_empty(&self) -> bool {
		self.results.is_empty()
	}

	/// Freezes the recorder into the run result handed back to the caller.
	pub fn finalize(self) -> RunResult {
		let finished_at = Utc::now();
		let sent = self.results.iter().filter(|r| r.status == TargetStatus::Sent).count();
		let failed = self.results.iter().filter(|r| r.status == TargetStatus::Failed).count();
		let skipped = self.results.iter().filter(|r| r.status == TargetStatus::Skipped).count();
		let duration = (finished_at - self.started_at).num_milliseconds().max(0) as f64 / 1000.0;

		RunResult {
			total_attempted: sent + failed,
			total_sent: sent,
			total_failed: failed,
			total_skipped: skipped,
			started_at: self.started_at,
			finished_at,
			duration_seconds: duration,
			results: self.results,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::ErrorKind;

	#[test]
	fn finalize_counts_each_status_once() {
		let mut recorder = Recorder::new(4);
		recorder.record(TargetResult::sent("a", "Hi", vec![AttemptOutcome::sent(1)], Duration::ZERO));
		recorder.record(TargetResult::failed(
			"b",
			"Hi",
			vec![AttemptOutcome::failed(1, ErrorKind::TargetNotFound)],
			Duration::ZERO,
			&SessionError::new(ErrorKind::TargetNotFound, "no such user"),
		));
		recorder.record(TargetResult::skipped("c"));
		recorder.record(TargetResult::sent("d", "Hi", vec![AttemptOutcome::sent(1)], Duration::ZERO));

		let report = recorder.finalize();
		assert_eq!(report.total_sent, 2);
		assert_eq!(report.total_failed, 1);
		assert_eq!(report.total_skipped, 1);
		assert_eq!(report.total_attempted, 3);
		assert_eq!(report.results.len(), 4);
	}

	#[test]
	fn report_serializes_with_camel_case_and_omits_absent_errors() {
		let mut recorder = Recorder::new(2);
		recorder.record(TargetResult::sent("a", "Hi", vec![AttemptOutcome::sent(1)], Duration::from_millis(12)));
		recorder.record(TargetResult::skipped("b"));
		let value = serde_json::to_value(recorder.finalize()).unwrap();

		assert_eq!(value["totalAttempted"], 1);
		assert_eq!(value["results"][0]["status"], "Sent");
		assert_eq!(value["results"][0]["processingTimeMs"], 12);
		assert!(value["results"][0].get("error").is_none());
		assert_eq!(value["results"][1]["status"], "Skipped");
		assert_eq!(value["results"][1]["message"], "");
	}

	#[test]
	fn attempt_outcome_records_error_kind_only_on_failure() {
		let sent = serde_json::to_value(AttemptOutcome::sent(1)).unwrap();
		assert!(sent.get("errorKind").is_none());

		let failed = serde_json::to_value(AttemptOutcome::failed(2, ErrorKind::Network)).unwrap();
		assert_eq!(failed["errorKind"], "NETWORK");
		assert_eq!(failed["attempt"], 2);
	}
}
