//! Job model: the validated run request.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{DispatchError, Result};

/// Upper bound on message length, matching the platform's own limit.
pub const MAX_MESSAGE_CHARS: usize = 1000;

/// Opaque authentication token for the platform session.
///
/// Debug output is redacted so the token never lands in logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// The raw token, for handing to a session implementation.
	pub fn expose(&self) -> &str {
		&self.0
	}

	fn normalize(&mut self) {
		self.0 = self.0.trim().to_string();
	}

	fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}

impl std::fmt::Debug for Credential {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str("Credential(<redacted>)")
	}
}

fn default_delay_seconds() -> f64 {
	60.0
}

fn default_max_retries() -> u32 {
	3
}

fn default_timeout_seconds() -> u64 {
	30
}

/// One complete automation request.
///
/// Constructed through [`Job::from_json`] or [`Job::from_value`], which run
/// validation exactly once; the orchestrator never re-checks invariants
/// mid-run. Unknown document fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
	pub credential: Credential,
	pub targets: Vec<String>,
	pub message_template: String,
	#[serde(default)]
	pub test_mode: bool,
	/// Minimum gap between consecutive targets, in seconds.
	#[serde(default = "default_delay_seconds")]
	pub delay_seconds: f64,
	/// Extra attempts allowed per target after the first.
	#[serde(default = "default_max_retries")]
	pub max_retries: u32,
	/// Deadline for each individual locate/submit call.
	#[serde(default = "default_timeout_seconds")]
	pub timeout_seconds: u64,
	/// Where the run report should be written, if anywhere.
	#[serde(default)]
	pub output_path: Option<PathBuf>,
}

impl Job {
	/// Parses and validates a job document.
	pub fn from_json(raw: &str) -> Result<Self> {
		let mut job: Job = serde_json::from_str(raw)?;
		job.validate()?;
		Ok(job)
	}

	/// Validates an already-parsed job document.
	pub fn from_value(value: serde_json::Value) -> Result<Self> {
		let mut job: Job = serde_json::from_value(value)?;
		job.validate()?;
		Ok(job)
	}

	fn validate(&mut self) -> Result<()> {
		self.credential.normalize();
		if self.credential.is_empty() {
			return Err(DispatchError::Validation("credential must not be empty".into()));
		}

		self.message_template = self.message_template.trim().to_string();
		if self.message_template.is_empty() {
			return Err(DispatchError::Validation("messageTemplate must not be empty".into()));
		}
		if self.message_template.chars().count() > MAX_MESSAGE_CHARS {
			return Err(DispatchError::Validation(format!(
				"messageTemplate exceeds {MAX_MESSAGE_CHARS} characters"
			)));
		}

		if !self.delay_seconds.is_finite() || self.delay_seconds < 0.0 {
			return Err(DispatchError::Validation("delaySeconds must be a non-negative number".into()));
		}

		// Trim, strip a leading @, drop empties, dedupe keeping first occurrence.
		let mut seen = HashSet::new();
		let mut targets = Vec::with_capacity(self.targets.len());
		for raw in &self.targets {
			let target = raw.trim().trim_start_matches('@');
			if target.is_empty() {
				continue;
			}
			if seen.insert(target.to_string()) {
				targets.push(target.to_string());
			}
		}
		if targets.is_empty() {
			return Err(DispatchError::Validation("at least one target is required".into()));
		}
		self.targets = targets;

		Ok(())
	}

	/// The message text delivered to every target. The template carries no
	/// per-target variables.
	pub fn rendered_message(&self) -> &str {
		&self.message_template
	}

	pub fn delay(&self) -> Duration {
		Duration::from_secs_f64(self.delay_seconds)
	}

	pub fn call_timeout(&self) -> Duration {
		Duration::from_secs(self.timeout_seconds)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn minimal(targets: &str) -> String {
		format!(r#"{{"credential":"session-token-1","targets":{targets},"messageTemplate":"Hi"}}"#)
	}

	#[test]
	fn defaults_apply_when_fields_are_absent() {
		let job = Job::from_json(&minimal(r#"["alice"]"#)).unwrap();
		assert!(!job.test_mode);
		assert_eq!(job.delay_seconds, 60.0);
		assert_eq!(job.max_retries, 3);
		assert_eq!(job.timeout_seconds, 30);
		assert!(job.output_path.is_none());
	}

	#[test]
	fn unknown_fields_are_ignored() {
		let raw = r#"{"credential":"tok","targets":["a"],"messageTemplate":"Hi","proxyConfiguration":{"useProxy":true}}"#;
		assert!(Job::from_json(raw).is_ok());
	}

	#[test]
	fn missing_required_field_is_rejected() {
		let raw = r#"{"targets":["a"],"messageTemplate":"Hi"}"#;
		assert!(matches!(Job::from_json(raw), Err(DispatchError::Json(_))));
	}

	#[test]
	fn targets_are_trimmed_deduped_and_stripped_of_at() {
		let job = Job::from_json(&minimal(r#"["@alice"," bob ","alice","","bob"]"#)).unwrap();
		assert_eq!(job.targets, vec!["alice", "bob"]);
	}

	#[test]
	fn empty_target_list_is_rejected() {
		let err = Job::from_json(&minimal(r#"[]"#)).unwrap_err();
		assert!(matches!(err, DispatchError::Validation(_)));
		// Whitespace-only entries normalize away to the same failure.
		let err = Job::from_json(&minimal(r#"["  ","@"]"#)).unwrap_err();
		assert!(matches!(err, DispatchError::Validation(_)));
	}

	#[test]
	fn blank_credential_is_rejected() {
		let raw = r#"{"credential":"   ","targets":["a"],"messageTemplate":"Hi"}"#;
		assert!(matches!(Job::from_json(raw), Err(DispatchError::Validation(_))));
	}

	#[test]
	fn oversized_message_is_rejected() {
		let long = "x".repeat(MAX_MESSAGE_CHARS + 1);
		let raw = format!(r#"{{"credential":"tok","targets":["a"],"messageTemplate":"{long}"}}"#);
		assert!(matches!(Job::from_json(&raw), Err(DispatchError::Validation(_))));
	}

	#[test]
	fn negative_delay_is_rejected() {
		let raw = r#"{"credential":"tok","targets":["a"],"messageTemplate":"Hi","delaySeconds":-1}"#;
		assert!(matches!(Job::from_json(raw), Err(DispatchError::Validation(_))));
	}

	#[test]
	fn credential_debug_is_redacted() {
		let credential = Credential::new("super-secret-token");
		let rendered = format!("{credential:?}");
		assert!(!rendered.contains("super-secret-token"));
	}
}
