//! Cooperative cancellation for in-flight runs.

use tokio::sync::watch;

/// Creates a linked handle/token pair for one run.
pub fn cancel_pair() -> (CancelHandle, CancelToken) {
	let (tx, rx) = watch::channel(false);
	(CancelHandle(tx), CancelToken(rx))
}

/// Operator-side handle. Cancelling is idempotent.
#[derive(Debug)]
pub struct CancelHandle(watch::Sender<bool>);

impl CancelHandle {
	pub fn cancel(&self) {
		let _ = self.0.send(true);
	}
}

/// Run-side token observed by the orchestrator at its suspension points.
#[derive(Debug, Clone)]
pub struct CancelToken(watch::Receiver<bool>);

impl CancelToken {
	/// A token that can never fire, for callers without an interrupt source.
	pub fn never() -> Self {
		let (_tx, rx) = watch::channel(false);
		Self(rx)
	}

	pub fn is_cancelled(&self) -> bool {
		*self.0.borrow()
	}

	/// Resolves once cancellation is requested; pends forever if the handle
	/// was dropped without cancelling.
	pub async fn cancelled(&mut self) {
		while !*self.0.borrow() {
			if self.0.changed().await.is_err() {
				std::future::pending::<()>().await;
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn handle_fires_token() {
		let (handle, mut token) = cancel_pair();
		assert!(!token.is_cancelled());
		handle.cancel();
		token.cancelled().await;
		assert!(token.is_cancelled());
	}

	#[tokio::test(start_paused = true)]
	async fn never_token_outlives_any_wait() {
		let mut token = CancelToken::never();
		let raced = tokio::select! {
			_ = token.cancelled() => true,
			_ = tokio::time::sleep(std::time::Duration::from_secs(3600)) => false,
		};
		assert!(!raced);
	}
}
