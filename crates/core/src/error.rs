//! Error taxonomy for dispatch runs.

use serde::{Deserialize, Serialize};

/// Closed classification of session-level failures.
///
/// Retry and abort decisions are total functions over this enum; nothing in
/// the core matches on error message text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
	/// Credential rejected or session invalidated; aborts the whole run.
	Authentication,
	/// Session could not be opened; aborts before any target is attempted.
	SessionOpen,
	/// Target does not exist on the platform; fails the target, no retry.
	TargetNotFound,
	/// Transient network failure; eligible for retry.
	Network,
	/// Operation exceeded its deadline; eligible for retry.
	Timeout,
	/// Platform refused the message; fails the target, no retry.
	SendRejected,
}

impl ErrorKind {
	/// Kinds worth another attempt against the same target.
	pub fn is_transient(self) -> bool {
		matches!(self, ErrorKind::Network | ErrorKind::Timeout)
	}

	/// Kinds that invalidate the session itself, not just one target.
	pub fn is_fatal(self) -> bool {
		matches!(self, ErrorKind::Authentication | ErrorKind::SessionOpen)
	}
}

impl std::fmt::Display for ErrorKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ErrorKind::Authentication => write!(f, "AUTHENTICATION"),
			ErrorKind::SessionOpen => write!(f, "SESSION_OPEN"),
			ErrorKind::TargetNotFound => write!(f, "TARGET_NOT_FOUND"),
			ErrorKind::Network => write!(f, "NETWORK"),
			ErrorKind::Timeout => write!(f, "TIMEOUT"),
			ErrorKind::SendRejected => write!(f, "SEND_REJECTED"),
		}
	}
}

/// Failure reported by a browsing-session operation.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct SessionError {
	pub kind: ErrorKind,
	pub message: String,
}

impl SessionError {
	pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
		Self {
			kind,
			message: message.into(),
		}
	}
}

/// Errors that can escape the core outside of a run.
///
/// Per-target failures never surface here; they are recorded in the report.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
	#[error("invalid job: {0}")]
	Validation(String),
	#[error("malformed job document: {0}")]
	Json(#[from] serde_json::Error),
	#[error(transparent)]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn transient_and_fatal_partition_the_taxonomy() {
		assert!(ErrorKind::Network.is_transient());
		assert!(ErrorKind::Timeout.is_transient());
		assert!(!ErrorKind::TargetNotFound.is_transient());
		assert!(!ErrorKind::SendRejected.is_transient());

		assert!(ErrorKind::Authentication.is_fatal());
		assert!(ErrorKind::SessionOpen.is_fatal());
		assert!(!ErrorKind::Network.is_fatal());

		// No kind is both retryable and run-ending.
		for kind in [
			ErrorKind::Authentication,
			ErrorKind::SessionOpen,
			ErrorKind::TargetNotFound,
			ErrorKind::Network,
			ErrorKind::Timeout,
			ErrorKind::SendRejected,
		] {
			assert!(!(kind.is_transient() && kind.is_fatal()), "{kind} is ambiguous");
		}
	}

	#[test]
	fn session_error_display_includes_kind() {
		let err = SessionError::new(ErrorKind::Timeout, "locate exceeded 30s deadline");
		assert_eq!(err.to_string(), "TIMEOUT: locate exceeded 30s deadline");
	}
}
