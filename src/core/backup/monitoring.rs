//! Job monitoring stage
//!
//! Polls every started job until it reaches a terminal state, then downloads
//! and persists the artifact of successful exports. Each job is driven by
//! its own worker task; outcomes go straight into the run's ledger.

use super::backoff::BackoffPolicy;
use super::ledger::BackupLedger;
use crate::adapters::quicksight::{ExportService, JobLifecycle};
use crate::adapters::storage::{artifact_filename, ArtifactSink};
use crate::domain::{AccountId, BackupStatus, JobHandle, JobOutcome};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::Instrument;

/// Ceiling on monitoring workers when none is configured
pub const MAX_MONITOR_WORKERS: usize = 32;

/// Message recorded when a failed job reports no errors
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Bounded-concurrency job poller and downloader
#[derive(Clone)]
pub struct MonitoringStage {
    service: Arc<dyn ExportService>,
    sink: ArtifactSink,
    account: AccountId,
    policy: BackoffPolicy,
    workers: Option<usize>,
}

impl MonitoringStage {
    pub fn new(service: Arc<dyn ExportService>, sink: ArtifactSink, account: AccountId) -> Self {
        Self {
            service,
            sink,
            account,
            policy: BackoffPolicy::polling(),
            workers: None,
        }
    }

    pub fn with_policy(mut self, policy: BackoffPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Fixed worker count; `None` means `min(32, jobs)`
    pub fn with_workers(mut self, workers: Option<usize>) -> Self {
        self.workers = workers;
        self
    }

    /// Workers used for `jobs` started jobs
    pub fn worker_count(&self, jobs: usize) -> usize {
        self.workers
            .unwrap_or_else(|| jobs.min(MAX_MONITOR_WORKERS))
            .max(1)
    }

    /// Monitors every job, recording one outcome per job in `ledger`
    pub async fn run(&self, jobs: Vec<JobHandle>, ledger: Arc<BackupLedger>) {
        let total = jobs.len();
        let workers = self.worker_count(total);
        tracing::info!(
            count = total,
            workers,
            "Phase 2: Monitoring jobs and downloading results"
        );

        let mut completions = stream::iter(jobs)
            .map(|job| {
                let stage = self.clone();
                let ledger = Arc::clone(&ledger);
                let name = job.name.clone();
                async move {
                    let task = async move {
                        let outcome = stage.monitor(&job).await;
                        let status = outcome.status;
                        ledger.record(outcome);
                        status
                    };
                    let result = tokio::spawn(task.in_current_span()).await;
                    (name, result)
                }
            })
            .buffer_unordered(workers);

        let mut completed = 0;
        while let Some((name, result)) = completions.next().await {
            completed += 1;
            match result {
                Ok(status) => {
                    tracing::debug!("Completed {completed}/{total}: {name} -> {status}");
                }
                Err(e) => {
                    tracing::error!(dashboard = %name, error = %e, "Monitoring task panicked");
                    ledger.record(
                        JobOutcome::new(name, BackupStatus::Error)
                            .with_message(format!("Monitoring task failed: {e}")),
                    );
                }
            }
        }

        tracing::info!("Phase 2 complete: All jobs monitored and downloads attempted");
    }

    /// Drives one job to its terminal outcome
    pub async fn monitor(&self, job: &JobHandle) -> JobOutcome {
        tracing::info!("{} Monitoring export: {}", job.position, job.name);

        for attempt in 0..self.policy.max_attempts {
            let snapshot = self
                .service
                .describe_export_job(&self.account, &job.job_id)
                .await;

            tracing::debug!(
                job_id = %job.job_id,
                attempt = attempt + 1,
                http_status = snapshot.http_status,
                job_status = %snapshot.lifecycle,
                "Job status"
            );

            if snapshot.http_status != 200 {
                return self.finish(
                    job,
                    JobOutcome::new(&job.name, BackupStatus::Error).with_message(format!(
                        "HTTP {} while checking job status",
                        snapshot.http_status
                    )),
                );
            }

            match snapshot.lifecycle {
                lifecycle if lifecycle.is_pending() => {
                    let delay = self.policy.delay_for(attempt);
                    tracing::debug!(
                        job_id = %job.job_id,
                        delay_secs = delay.as_secs(),
                        "Job still running"
                    );
                    tokio::time::sleep(delay).await;
                }
                JobLifecycle::Successful => {
                    let outcome = self.download(job, snapshot.download_url).await;
                    return self.finish(job, outcome);
                }
                JobLifecycle::Failed => {
                    let message = snapshot
                        .errors
                        .into_iter()
                        .next()
                        .unwrap_or_else(|| UNKNOWN_ERROR.to_string());
                    return self.finish(
                        job,
                        JobOutcome::new(&job.name, BackupStatus::Failed).with_message(message),
                    );
                }
                other => {
                    return self.finish(
                        job,
                        JobOutcome::new(&job.name, BackupStatus::UnexpectedStatus)
                            .with_message(format!("Unexpected job status: {other}")),
                    );
                }
            }
        }

        self.finish(
            job,
            JobOutcome::new(&job.name, BackupStatus::Timeout).with_message(format!(
                "Job still running after {} status checks",
                self.policy.max_attempts
            )),
        )
    }

    async fn download(&self, job: &JobHandle, download_url: Option<String>) -> JobOutcome {
        let Some(url) = download_url.filter(|u| !u.is_empty()) else {
            return JobOutcome::new(&job.name, BackupStatus::DownloadFailed)
                .with_message("Export job returned no download URL");
        };

        let bytes = match self.service.fetch_artifact(&url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return JobOutcome::new(&job.name, BackupStatus::DownloadFailed)
                    .with_message(e.to_string())
            }
        };

        match self.sink.persist(&artifact_filename(&job.name), bytes).await {
            Ok(artifact) => JobOutcome::new(&job.name, BackupStatus::Success).with_artifact(artifact),
            Err(e) => JobOutcome::new(&job.name, BackupStatus::DownloadFailed)
                .with_message(e.to_string()),
        }
    }

    fn finish(&self, job: &JobHandle, outcome: JobOutcome) -> JobOutcome {
        match (&outcome.status, &outcome.artifact, &outcome.message) {
            (BackupStatus::Success, Some(artifact), _) => {
                tracing::info!("  ✓ {}: Backup saved to {}", job.name, artifact.location);
            }
            (status, _, Some(message)) => {
                tracing::warn!("  ✗ {}: {} - {}", job.name, status, message);
            }
            (status, _, None) => {
                tracing::warn!("  ✗ {}: {}", job.name, status);
            }
        }
        outcome
    }
}
