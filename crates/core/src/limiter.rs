//! Inter-send pacing.

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::cancel::CancelToken;

/// Enforces a minimum gap between consecutive target attempts.
///
/// The gap is measured from the end of the previous wait (run start for the
/// first), so time spent processing a target never shortens the enforced
/// spacing.
#[derive(Debug)]
pub struct RateLimiter {
	delay: Duration,
	mark: Instant,
}

impl RateLimiter {
	pub fn new(delay: Duration) -> Self {
		Self {
			delay,
			mark: Instant::now(),
		}
	}

	/// Blocks until the configured gap has elapsed. Returns `false` when
	/// interrupted by cancellation before the deadline.
	pub async fn wait_before_next(&mut self, cancel: &mut CancelToken) -> bool {
		if cancel.is_cancelled() {
			return false;
		}
		let deadline = self.mark + self.delay;
		tokio::select! {
			_ = time::sleep_until(deadline) => {
				self.mark = Instant::now().max(deadline);
				true
			}
			_ = cancel.cancelled() => false,
		}
	}
}
