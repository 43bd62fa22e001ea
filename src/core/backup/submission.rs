//! Job submission stage
//!
//! Starts one export job per dashboard with a small worker pool. The service
//! admits only a handful of concurrent export jobs per account, so admission
//! rejections are retried with exponential backoff; every other start error
//! is final for that dashboard.

use super::backoff::BackoffPolicy;
use crate::adapters::quicksight::{ExportService, JobStartResult};
use crate::domain::{
    AccountId, BackupStatus, ExportJobError, ExportableItem, JobHandle, JobOutcome, Position,
    SubmissionRequest,
};
use crate::log_retry_attempt;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::Instrument;

/// Default number of concurrent submissions
pub const START_WORKERS: usize = 3;

/// What the submission stage produced
#[derive(Debug, Default)]
pub struct SubmissionReport {
    /// Jobs started and awaiting monitoring
    pub jobs: Vec<JobHandle>,
    /// Terminal outcomes for dashboards that never got a job
    pub failed: Vec<JobOutcome>,
}

enum Submitted {
    Started(JobHandle),
    Rejected(JobOutcome),
}

/// Bounded-concurrency export job starter
#[derive(Clone)]
pub struct SubmissionStage {
    service: Arc<dyn ExportService>,
    account: AccountId,
    policy: BackoffPolicy,
    workers: usize,
}

impl SubmissionStage {
    pub fn new(service: Arc<dyn ExportService>, account: AccountId) -> Self {
        Self {
            service,
            account,
            policy: BackoffPolicy::submission(),
            workers: START_WORKERS,
        }
    }

    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Submits every item and waits for all submissions to settle
    ///
    /// Each item lands in exactly one of `jobs` or `failed`, in completion
    /// order.
    pub async fn run(&self, items: Vec<ExportableItem>) -> SubmissionReport {
        let total = items.len();
        tracing::info!(
            count = total,
            workers = self.workers,
            "Phase 1: Starting export jobs"
        );

        let results: Vec<(String, Result<Submitted, tokio::task::JoinError>)> =
            stream::iter(items.into_iter().enumerate())
                .map(|(i, item)| {
                    let stage = self.clone();
                    let name = item.name.clone();
                    let position = Position::new(i + 1, total);
                    async move {
                        let task = async move { stage.submit(item, position).await };
                        let result = tokio::spawn(task.in_current_span()).await;
                        (name, result)
                    }
                })
                .buffer_unordered(self.workers)
                .collect()
                .await;

        let mut report = SubmissionReport::default();
        for (name, result) in results {
            match result {
                Ok(Submitted::Started(handle)) => report.jobs.push(handle),
                Ok(Submitted::Rejected(outcome)) => report.failed.push(outcome),
                Err(e) => {
                    tracing::error!(dashboard = %name, error = %e, "Export start task panicked");
                    report.failed.push(
                        JobOutcome::new(name, BackupStatus::ExportStartFailed)
                            .with_message(format!("Submission task failed: {e}")),
                    );
                }
            }
        }

        tracing::info!(
            started = report.jobs.len(),
            failed = report.failed.len(),
            "Phase 1 complete"
        );
        report
    }

    async fn submit(&self, item: ExportableItem, position: Position) -> Submitted {
        let name = item.name.clone();
        let Some(request) = SubmissionRequest::prepare(item, position) else {
            tracing::info!("{position} Skipping {name} - Missing ARN");
            return Submitted::Rejected(JobOutcome::new(name, BackupStatus::MissingArn));
        };

        tracing::info!("{position} Starting export: {name}");

        match self.start_with_retry(&request).await {
            Ok(started) => {
                tracing::info!(
                    job_id = %started.job_id,
                    job_arn = started.job_arn.as_deref().unwrap_or_default(),
                    http_status = started.http_status,
                    "  ✓ {name}: Export job started"
                );
                Submitted::Started(JobHandle::from(&request))
            }
            Err(e) => {
                tracing::warn!(job_id = %request.job_id, error = %e, "  ✗ {name}: Failed to start export job");
                Submitted::Rejected(
                    JobOutcome::new(name, BackupStatus::ExportStartFailed)
                        .with_message(e.to_string()),
                )
            }
        }
    }

    async fn start_with_retry(
        &self,
        request: &SubmissionRequest,
    ) -> Result<JobStartResult, ExportJobError> {
        let mut attempt = 0;
        loop {
            match self
                .service
                .start_export_job(&self.account, &request.job_id, &request.resource_arn)
                .await
            {
                Ok(started) => return Ok(started),
                Err(e) if e.is_admission_limit() && attempt + 1 < self.policy.max_attempts => {
                    let delay = self.policy.delay_for(attempt);
                    log_retry_attempt!(
                        request.item.name,
                        attempt + 1,
                        self.policy.max_attempts,
                        delay.as_secs()
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
