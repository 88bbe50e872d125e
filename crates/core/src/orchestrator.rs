//! The dispatch orchestrator: drives one job to completion.

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::cancel::CancelToken;
use crate::error::{ErrorKind, SessionError};
use crate::job::Job;
use crate::limiter::RateLimiter;
use crate::progress::{ProgressEvent, ProgressSink};
use crate::report::{AttemptOutcome, Recorder, RunResult, TargetResult, TargetStatus};
use crate::retry::RetryPolicy;
use crate::session::BrowsingSession;

/// Why the per-target loop stopped before the end of the list.
enum Abort {
	Fatal(ErrorKind),
	Cancelled,
}

/// Sequentially dispatches a job's message to every target.
///
/// One exclusive session, one target at a time; pacing, retries and outcome
/// recording happen here and nowhere else.
#[derive(Debug, Default)]
pub struct Orchestrator {
	retry: RetryPolicy,
}

impl Orchestrator {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_retry_policy(retry: RetryPolicy) -> Self {
		Self { retry }
	}

	/// Drives `job` through `session` and returns the finished report.
	///
	/// Always yields one [`TargetResult`] per job target, in input order,
	/// and closes the session on every exit path. Per-target failures are
	/// recorded, never propagated; fatal session failures and cancellation
	/// mark the remaining targets as skipped.
	pub async fn run<S>(&self, job: &Job, mut session: S, sink: &dyn ProgressSink, mut cancel: CancelToken) -> RunResult
	where
		S: BrowsingSession,
	{
		let total = job.targets.len();
		info!(target = "dmq.run", targets = total, test_mode = job.test_mode, "starting dispatch run");
		sink.on_event(&ProgressEvent::RunStarted {
			total,
			test_mode: job.test_mode,
		});

		let mut recorder = Recorder::new(total);

		let abort = match session.open(&job.credential).await {
			Ok(()) => self.drive(job, &mut session, sink, &mut cancel, &mut recorder).await,
			Err(err) => {
				warn!(target = "dmq.session", error = %err, "session open failed");
				Some(Abort::Fatal(if err.kind.is_fatal() { err.kind } else { ErrorKind::SessionOpen }))
			}
		};

		match &abort {
			Some(Abort::Fatal(kind)) => {
				warn!(
					target = "dmq.run",
					%kind,
					remaining = total - recorder.len(),
					"fatal session error; skipping remaining targets"
				);
			}
			Some(Abort::Cancelled) => {
				info!(
					target = "dmq.run",
					remaining = total - recorder.len(),
					"run cancelled; skipping remaining targets"
				);
			}
			None => {}
		}

		// Targets the loop never reached still get a report entry.
		for target in job.targets.iter().skip(recorder.len()) {
			sink.on_event(&ProgressEvent::TargetSkipped { target });
			recorder.record(TargetResult::skipped(target));
		}

		session.close().await;

		let report = recorder.finalize();
		sink.on_event(&ProgressEvent::RunFinished {
			sent: report.total_sent,
			failed: report.total_failed,
			skipped: report.total_skipped,
		});
		info!(
			target = "dmq.run",
			sent = report.total_sent,
			failed = report.total_failed,
			skipped = report.total_skipped,
			duration_seconds = report.duration_seconds,
			"dispatch run finished"
		);
		report
	}

	async fn drive<S>(
		&self,
		job: &Job,
		session: &mut S,
		sink: &dyn ProgressSink,
		cancel: &mut CancelToken,
		recorder: &mut Recorder,
	) -> Option<Abort>
	where
		S: BrowsingSession,
	{
		let total = job.targets.len();
		let mut limiter = RateLimiter::new(job.delay());

		for (index, target) in job.targets.iter().enumerate() {
			// The gap is enforced between targets, not before the first.
			if index > 0 && !limiter.wait_before_next(cancel).await {
				return Some(Abort::Cancelled);
			}
			if cancel.is_cancelled() {
				return Some(Abort::Cancelled);
			}

			let (result, abort) = self.dispatch_target(job, session, sink, cancel, target, index, total).await;
			match result.status {
				TargetStatus::Sent => sink.on_event(&ProgressEvent::TargetSent {
					target,
					attempts: result.attempts.len() as u32,
					test_mode: job.test_mode,
				}),
				_ => {
					if let Some(kind) = result.attempts.last().and_then(|a| a.error_kind) {
						sink.on_event(&ProgressEvent::TargetFailed {
							target,
							attempts: result.attempts.len() as u32,
							kind,
						});
					}
				}
			}
			recorder.record(result);

			if abort.is_some() {
				return abort;
			}
		}

		None
	}

	/// Runs the attempt loop for a single target. Returns its result plus
	/// an abort reason when the failure invalidates the rest of the run.
	async fn dispatch_target<S>(
		&self,
		job: &Job,
		session: &mut S,
		sink: &dyn ProgressSink,
		cancel: &mut CancelToken,
		target: &str,
		index: usize,
		total: usize,
	) -> (TargetResult, Option<Abort>)
	where
		S: BrowsingSession,
	{
		let started = Instant::now();
		let message = job.rendered_message();

		if job.test_mode {
			sink.on_event(&ProgressEvent::AttemptStarted {
				target,
				index,
				total,
				attempt: 1,
			});
			debug!(target = "dmq.run", recipient = %target, "test mode; recording send without submitting");
			let attempts = vec![AttemptOutcome::sent(1)];
			return (TargetResult::sent(target, message, attempts, started.elapsed()), None);
		}

		let mut attempts = Vec::new();
		let mut attempt = 1u32;
		loop {
			sink.on_event(&ProgressEvent::AttemptStarted {
				target,
				index,
				total,
				attempt,
			});

			match self.try_send(job, session, target, message).await {
				Ok(()) => {
					attempts.push(AttemptOutcome::sent(attempt));
					debug!(target = "dmq.run", recipient = %target, attempt, "message sent");
					return (TargetResult::sent(target, message, attempts, started.elapsed()), None);
				}
				Err(err) => {
					attempts.push(AttemptOutcome::failed(attempt, err.kind));

					if err.kind.is_fatal() {
						warn!(target = "dmq.run", recipient = %target, error = %err, "session invalidated");
						let result = TargetResult::failed(target, message, attempts, started.elapsed(), &err);
						return (result, Some(Abort::Fatal(err.kind)));
					}

					if !self.retry.should_retry(attempt, job.max_retries, err.kind) {
						warn!(target = "dmq.run", recipient = %target, attempt, error = %err, "giving up on target");
						let result = TargetResult::failed(target, message, attempts, started.elapsed(), &err);
						return (result, None);
					}

					let backoff = self.retry.backoff_for(attempt);
					debug!(
						target = "dmq.run",
						recipient = %target,
						attempt,
						backoff_ms = backoff.as_millis() as u64,
						error = %err,
						"retrying after backoff"
					);
					if !sleep_cancellable(backoff, cancel).await {
						let result = TargetResult::failed(target, message, attempts, started.elapsed(), &err);
						return (result, Some(Abort::Cancelled));
					}
					attempt += 1;
				}
			}
		}
	}

	async fn try_send<S>(&self, job: &Job, session: &mut S, target: &str, message: &str) -> Result<(), SessionError>
	where
		S: BrowsingSession,
	{
		bounded(job.call_timeout(), session.locate_target(target)).await?;
		bounded(job.call_timeout(), session.submit_message(message)).await
	}
}

/// Bounds a session call by the job's per-call deadline; overruns are
/// classified as transient timeouts.
async fn bounded<F>(limit: Duration, op: F) -> Result<(), SessionError>
where
	F: Future<Output = Result<(), SessionError>>,
{
	match time::timeout(limit, op).await {
		Ok(result) => result,
		Err(_) => Err(SessionError::new(
			ErrorKind::Timeout,
			format!("operation exceeded {}s deadline", limit.as_secs()),
		)),
	}
}

async fn sleep_cancellable(duration: Duration, cancel: &mut CancelToken) -> bool {
	if cancel.is_cancelled() {
		return false;
	}
	tokio::select! {
		_ = time::sleep(duration) => true,
		_ = cancel.cancelled() => false,
	}
}
