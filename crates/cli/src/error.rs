//! CLI-level errors.

use dmq_core::DispatchError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
	#[error(transparent)]
	Dispatch(#[from] DispatchError),
	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
	#[error("driver client setup failed: {0}")]
	Http(#[from] reqwest::Error),
	#[error("failed to encode report: {0}")]
	Report(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
