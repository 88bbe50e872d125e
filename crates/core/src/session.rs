//! The browsing-session capability consumed by the orchestrator.

use async_trait::async_trait;

use crate::error::SessionError;
use crate::job::Credential;

/// One exclusive authenticated interactive session with the platform.
///
/// The orchestrator owns the session for the whole run and is its only
/// caller; implementations live at the edges (driver shims, test fakes).
#[async_trait]
pub trait BrowsingSession: Send {
	/// Opens the session and authenticates with `credential`.
	async fn open(&mut self, credential: &Credential) -> Result<(), SessionError>;

	/// Brings the conversation with `target` into focus.
	async fn locate_target(&mut self, target: &str) -> Result<(), SessionError>;

	/// Submits `text` into the currently located conversation.
	async fn submit_message(&mut self, text: &str) -> Result<(), SessionError>;

	/// Releases the session. Idempotent; invoked on every exit path.
	async fn close(&mut self);
}
