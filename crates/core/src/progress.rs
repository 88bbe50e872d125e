//! Progress events emitted while a run is in flight.

use crate::error::ErrorKind;

/// Orchestrator lifecycle notifications.
///
/// Presentation only; nothing feeds back into dispatch decisions. `index`
/// is the zero-based position in the target list, `attempt` is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent<'a> {
	RunStarted {
		total: usize,
		test_mode: bool,
	},
	AttemptStarted {
		target: &'a str,
		index: usize,
		total: usize,
		attempt: u32,
	},
	TargetSent {
		target: &'a str,
		attempts: u32,
		test_mode: bool,
	},
	TargetFailed {
		target: &'a str,
		attempts: u32,
		kind: ErrorKind,
	},
	TargetSkipped {
		target: &'a str,
	},
	RunFinished {
		sent: usize,
		failed: usize,
		skipped: usize,
	},
}

/// Receiver for [`ProgressEvent`]s. Fire-and-forget: implementations must
/// not block and must not panic.
pub trait ProgressSink {
	fn on_event(&self, event: &ProgressEvent<'_>);
}

/// Sink that drops every event.
#[derive(Debug, Default)]
pub struct NullSink;

impl ProgressSink for NullSink {
	fn on_event(&self, _event: &ProgressEvent<'_>) {}
}
