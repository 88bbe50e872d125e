//! Session implementations: the remote automation driver and the
//! test-mode null session.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, warn};

use dmq_core::{BrowsingSession, Credential, ErrorKind, SessionError};

/// JSON-over-HTTP client for a running automation driver daemon.
///
/// The driver owns the real browser; this shim maps the dispatch operations
/// onto its endpoints and its failures onto the closed error taxonomy.
pub struct DriverSession {
	client: reqwest::Client,
	base: String,
	session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenResponse {
	session_id: String,
}

#[derive(Debug, Deserialize)]
struct DriverFailure {
	#[serde(default)]
	message: String,
}

impl DriverSession {
	pub fn new(base: &str) -> crate::error::Result<Self> {
		let client = reqwest::Client::builder().build()?;
		Ok(Self {
			client,
			base: base.trim_end_matches('/').to_string(),
			session_id: None,
		})
	}

	fn endpoint(&self, path: &str) -> String {
		format!("{}{path}", self.base)
	}

	fn session_path(&self, suffix: &str) -> Result<String, SessionError> {
		match &self.session_id {
			Some(id) => Ok(format!("/session/{id}{suffix}")),
			None => Err(SessionError::new(ErrorKind::SessionOpen, "session not open")),
		}
	}

	async fn post(&self, path: &str, body: serde_json::Value) -> Result<reqwest::Response, SessionError> {
		self.client.post(self.endpoint(path)).json(&body).send().await.map_err(|err| {
			let kind = if err.is_timeout() { ErrorKind::Timeout } else { ErrorKind::Network };
			SessionError::new(kind, err.to_string())
		})
	}

	async fn failure(kind: ErrorKind, response: reqwest::Response) -> SessionError {
		let status = response.status();
		let message = match response.json::<DriverFailure>().await {
			Ok(body) if !body.message.is_empty() => body.message,
			_ => format!("driver returned {status}"),
		};
		SessionError::new(kind, message)
	}

	/// Maps a non-success driver status onto the taxonomy; statuses without
	/// a dedicated meaning fall back to the operation's default kind.
	fn classify(status: StatusCode, default: ErrorKind) -> ErrorKind {
		match status {
			StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ErrorKind::Authentication,
			StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => ErrorKind::Timeout,
			StatusCode::TOO_MANY_REQUESTS | StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => ErrorKind::Network,
			_ => default,
		}
	}
}

#[async_trait]
impl BrowsingSession for DriverSession {
	async fn open(&mut self, credential: &Credential) -> Result<(), SessionError> {
		let response = self
			.post("/session", json!({ "credential": credential.expose() }))
			.await
			.map_err(|err| SessionError::new(ErrorKind::SessionOpen, err.message))?;

		let status = response.status();
		if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
			return Err(Self::failure(ErrorKind::Authentication, response).await);
		}
		if !status.is_success() {
			return Err(Self::failure(ErrorKind::SessionOpen, response).await);
		}

		let body: OpenResponse = response
			.json()
			.await
			.map_err(|err| SessionError::new(ErrorKind::SessionOpen, err.to_string()))?;
		debug!(target = "dmq.session", session_id = %body.session_id, "driver session open");
		self.session_id = Some(body.session_id);
		Ok(())
	}

	async fn locate_target(&mut self, target: &str) -> Result<(), SessionError> {
		let path = self.session_path("/locate")?;
		let response = self.post(&path, json!({ "target": target })).await?;
		match response.status() {
			status if status.is_success() => Ok(()),
			StatusCode::NOT_FOUND => Err(Self::failure(ErrorKind::TargetNotFound, response).await),
			status => Err(Self::failure(Self::classify(status, ErrorKind::Network), response).await),
		}
	}

	async fn submit_message(&mut self, text: &str) -> Result<(), SessionError> {
		let path = self.session_path("/message")?;
		let response = self.post(&path, json!({ "text": text })).await?;
		match response.status() {
			status if status.is_success() => Ok(()),
			StatusCode::UNPROCESSABLE_ENTITY => Err(Self::failure(ErrorKind::SendRejected, response).await),
			status => Err(Self::failure(Self::classify(status, ErrorKind::SendRejected), response).await),
		}
	}

	async fn close(&mut self) {
		let Some(id) = self.session_id.take() else {
			return;
		};
		let endpoint = self.endpoint(&format!("/session/{id}"));
		if let Err(err) = self.client.delete(endpoint).send().await {
			warn!(target = "dmq.session", error = %err, "driver session close failed");
		}
	}
}

/// Session used in test mode: opens trivially and never reaches the
/// platform. Submitting is an error so a wiring mistake cannot silently
/// deliver messages during a rehearsal.
#[derive(Debug, Default)]
pub struct NullSession {
	open: bool,
}

#[async_trait]
impl BrowsingSession for NullSession {
	async fn open(&mut self, _credential: &Credential) -> Result<(), SessionError> {
		self.open = true;
		Ok(())
	}

	async fn locate_target(&mut self, _target: &str) -> Result<(), SessionError> {
		if !self.open {
			return Err(SessionError::new(ErrorKind::SessionOpen, "session not open"));
		}
		Ok(())
	}

	async fn submit_message(&mut self, _text: &str) -> Result<(), SessionError> {
		Err(SessionError::new(ErrorKind::SendRejected, "null session cannot deliver messages"))
	}

	async fn close(&mut self) {
		self.open = false;
	}
}
