//! Asynchronous commit of a finished wizard.
//!
//! The default committer only simulates network latency. Every commit runs
//! under a timeout and the owning instance's cancellation token.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::CommitError;
use crate::notify::{Notifier, Severity};
use crate::surface::{SubmitControl, Surface};
use crate::wizard::instance::WizardConfig;
use crate::wizard::navigator::{Navigator, Progress};
use crate::wizard::record::SharedRecord;
use crate::wizard::step::FieldError;
use crate::wizard::summary::{Summary, SummaryBuilder};

pub const DEFAULT_SUBMIT_DELAY: Duration = Duration::from_millis(1800);
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(10);

/// Time source used by committers so tests can run without waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Wall clock backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Acknowledgement returned by a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub id: Uuid,
    pub submitted_at: DateTime<Utc>,
    pub fields: usize,
}

#[async_trait]
pub trait Committer: Send + Sync {
    async fn commit(&self, record: &SharedRecord) -> Result<Receipt, CommitError>;
}

/// Stand-in for a network submission: waits `latency`, then succeeds.
pub struct SimulatedCommit {
    latency: Duration,
    clock: Arc<dyn Clock>,
}

impl SimulatedCommit {
    pub fn new(latency: Duration) -> Self {
        Self::with_clock(latency, Arc::new(SystemClock))
    }

    pub fn with_clock(latency: Duration, clock: Arc<dyn Clock>) -> Self {
        Self { latency, clock }
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for SimulatedCommit {
    fn default() -> Self {
        Self::new(DEFAULT_SUBMIT_DELAY)
    }
}

#[async_trait]
impl Committer for SimulatedCommit {
    async fn commit(&self, record: &SharedRecord) -> Result<Receipt, CommitError> {
        self.clock.sleep(self.latency).await;
        Ok(Receipt {
            id: Uuid::new_v4(),
            submitted_at: self.clock.now(),
            fields: record.len(),
        })
    }
}

/// Raw result of the awaited commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Committed(Receipt),
    Failed(CommitError),
    Cancelled,
}

/// Result of a submit action as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Completed { summary: Summary, receipt: Receipt },
    Rejected(Vec<FieldError>),
    Failed(CommitError),
    Cancelled,
    Ignored,
}

impl SubmitOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed { .. })
    }
}

pub struct SubmissionController {
    timeout: Duration,
    cancel: CancellationToken,
}

impl SubmissionController {
    pub fn new(timeout: Duration, cancel: CancellationToken) -> Self {
        Self { timeout, cancel }
    }

    /// Awaits `committer` under the timeout, aborting on cancellation.
    pub async fn run<C: Committer + ?Sized>(
        &self,
        committer: &C,
        record: &SharedRecord,
    ) -> CommitOutcome {
        if self.cancel.is_cancelled() {
            return CommitOutcome::Cancelled;
        }
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => CommitOutcome::Cancelled,
            result = tokio::time::timeout(self.timeout, committer.commit(record)) => match result {
                Ok(Ok(receipt)) => CommitOutcome::Committed(receipt),
                Ok(Err(CommitError::Cancelled)) => CommitOutcome::Cancelled,
                Ok(Err(err)) => CommitOutcome::Failed(err),
                Err(_) => CommitOutcome::Failed(CommitError::TimedOut(self.timeout)),
            },
        }
    }

    /// Locks the UI, commits, and renders the terminal or retry state.
    ///
    /// Callers must have passed the final-step gate already.
    pub(crate) async fn execute<S, C, N>(
        &self,
        navigator: &mut Navigator,
        surface: &mut S,
        config: &WizardConfig,
        record: &SharedRecord,
        committer: &C,
        notifier: &N,
    ) -> SubmitOutcome
    where
        S: Surface + ?Sized,
        C: Committer + ?Sized,
        N: Notifier + ?Sized,
    {
        let flow = config.mount_id();
        surface.set_submit(flow, SubmitControl::busy());
        if !navigator.lock() {
            surface.set_submit(flow, SubmitControl::enabled());
            return SubmitOutcome::Ignored;
        }
        info!(flow, fields = record.len(), "submission locked, committing");

        match self.run(committer, record).await {
            CommitOutcome::Committed(receipt) => {
                let summary = SummaryBuilder::build(record);
                surface.reveal_done(&config.mount_ids(), &summary);
                surface.render_progress(flow, &Progress::complete(navigator.total()));
                surface.set_submit(flow, SubmitControl::spent());
                notifier.notify(config.success_message(), Severity::Ok);
                navigator.finish();
                info!(flow, receipt = %receipt.id, rows = summary.rows.len(), "submission completed");
                SubmitOutcome::Completed { summary, receipt }
            }
            CommitOutcome::Failed(err) => {
                warn!(flow, error = %err, "submission failed; submit re-enabled");
                surface.set_submit(flow, SubmitControl::enabled());
                surface.set_banner(flow, Some(config.failure_message()));
                notifier.notify(config.failure_message(), Severity::Err);
                navigator.unlock();
                SubmitOutcome::Failed(err)
            }
            CommitOutcome::Cancelled => {
                info!(flow, "submission cancelled by teardown");
                SubmitOutcome::Cancelled
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    #[async_trait]
    impl Committer for Failing {
        async fn commit(&self, _record: &SharedRecord) -> Result<Receipt, CommitError> {
            Err(CommitError::Rejected("503".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_commit_waits_for_latency() {
        let controller =
            SubmissionController::new(DEFAULT_SUBMIT_TIMEOUT, CancellationToken::new());
        let started = tokio::time::Instant::now();
        let outcome = controller
            .run(&SimulatedCommit::default(), &SharedRecord::new())
            .await;
        assert!(matches!(outcome, CommitOutcome::Committed(_)));
        assert!(started.elapsed() >= DEFAULT_SUBMIT_DELAY);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_commit_times_out() {
        let timeout = Duration::from_millis(500);
        let controller = SubmissionController::new(timeout, CancellationToken::new());
        let outcome = controller
            .run(&SimulatedCommit::new(Duration::from_secs(5)), &SharedRecord::new())
            .await;
        assert_eq!(outcome, CommitOutcome::Failed(CommitError::TimedOut(timeout)));
    }

    #[tokio::test]
    async fn rejection_is_reported_as_failure() {
        let controller =
            SubmissionController::new(DEFAULT_SUBMIT_TIMEOUT, CancellationToken::new());
        let outcome = controller.run(&Failing, &SharedRecord::new()).await;
        assert_eq!(
            outcome,
            CommitOutcome::Failed(CommitError::Rejected("503".into()))
        );
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancellationToken::new();
        token.cancel();
        let controller = SubmissionController::new(DEFAULT_SUBMIT_TIMEOUT, token);
        let outcome = controller
            .run(&SimulatedCommit::default(), &SharedRecord::new())
            .await;
        assert_eq!(outcome, CommitOutcome::Cancelled);
    }
}
