pub mod run;
pub mod validate;

use crate::cli::{Cli, Commands};
use crate::error::Result;

/// Dispatches the parsed command; returns the process exit code.
pub async fn dispatch(cli: Cli) -> Result<i32> {
	match cli.command {
		Commands::Validate { input } => validate::execute(&input).await,
		Commands::Run { input, output, driver_url } => run::execute(&input, output.as_deref(), &driver_url).await,
	}
}
