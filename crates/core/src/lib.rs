//! Sequential direct-message dispatch.
//!
//! The orchestrator drives one exclusive browsing session through an ordered
//! target list, enforcing inter-send pacing, retrying transient failures and
//! producing a complete, ordered run report on every exit path.

pub mod cancel;
pub mod error;
pub mod job;
pub mod limiter;
pub mod orchestrator;
pub mod progress;
pub mod report;
pub mod retry;
pub mod session;

pub use cancel::{CancelHandle, CancelToken, cancel_pair};
pub use error::{DispatchError, ErrorKind, Result, SessionError};
pub use job::{Credential, Job};
pub use orchestrator::Orchestrator;
pub use progress::{NullSink, ProgressEvent, ProgressSink};
pub use report::{AttemptOutcome, AttemptStatus, RunResult, TargetResult, TargetStatus};
pub use retry::RetryPolicy;
pub use session::BrowsingSession;
