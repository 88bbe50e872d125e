//! Retry decisions and backoff timing.

use std::time::Duration;

use crate::error::ErrorKind;

/// Default pause unit between attempts against the same target.
pub const DEFAULT_BACKOFF_BASE: Duration = Duration::from_secs(5);

/// Deterministic retry policy: transient kinds only, linear backoff.
///
/// Backoff grows linearly with the attempt number and the attempt count is
/// capped by the job, so total run time stays predictable.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
	base: Duration,
}

impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			base: DEFAULT_BACKOFF_BASE,
		}
	}
}

impl RetryPolicy {
	pub fn new(base: Duration) -> Self {
		Self { base }
	}

	/// Whether attempt number `attempt` (1-based), having failed with
	/// `kind`, should be followed by another attempt.
	pub fn should_retry(&self, attempt: u32, max_retries: u32, kind: ErrorKind) -> bool {
		attempt <= max_retries && kind.is_transient()
	}

	/// Pause before the attempt that follows failed attempt `attempt`.
	pub fn backoff_for(&self, attempt: u32) -> Duration {
		self.base * attempt
	}
}
