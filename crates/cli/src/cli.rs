use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "dmq")]
#[command(about = "Bulk direct-message dispatch with rate limiting and retries")]
#[command(version)]
pub struct Cli {
	/// Increase verbosity (-v info, -vv debug)
	#[arg(short, long, global = true, action = clap::ArgAction::Count)]
	pub verbose: u8,

	#[command(subcommand)]
	pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
	/// Check a job document against the input invariants without opening a session
	#[command(alias = "check")]
	Validate {
		/// Path to the job document (JSON)
		input: PathBuf,
	},

	/// Execute a job: open a session, dispatch to every target, write the report
	Run {
		/// Path to the job document (JSON)
		input: PathBuf,

		/// Write the run report here (overrides the job's outputPath)
		#[arg(short, long, value_name = "FILE")]
		output: Option<PathBuf>,

		/// Automation driver endpoint
		#[arg(long, value_name = "URL", default_value = "http://127.0.0.1:4567")]
		driver_url: String,
	},
}
