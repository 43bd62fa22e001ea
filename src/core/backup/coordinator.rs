//! Backup coordinator - main orchestrator for a backup run
//!
//! Enumerates dashboards, runs the submission stage, then the monitoring
//! stage, and collects one outcome per dashboard into the run's ledger.

use super::backoff::BackoffPolicy;
use super::ledger::BackupLedger;
use super::monitoring::MonitoringStage;
use super::report::BackupReport;
use super::submission::{SubmissionStage, START_WORKERS};
use crate::adapters::aws::AwsContext;
use crate::adapters::quicksight::ExportService;
use crate::adapters::storage::ArtifactSink;
use crate::config::{ExportConfig, VaultConfig};
use crate::domain::{AccountId, ExportableItem, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;
use uuid::Uuid;

/// Backup coordinator
pub struct BackupCoordinator {
    service: Arc<dyn ExportService>,
    sink: ArtifactSink,
    account: AccountId,
    submission_policy: BackoffPolicy,
    polling_policy: BackoffPolicy,
    start_workers: usize,
    monitor_workers: Option<usize>,
    ledger: Arc<BackupLedger>,
}

impl BackupCoordinator {
    /// Create a coordinator over explicit collaborators
    pub fn new(service: Arc<dyn ExportService>, sink: ArtifactSink, account: AccountId) -> Self {
        Self {
            service,
            sink,
            account,
            submission_policy: BackoffPolicy::submission(),
            polling_policy: BackoffPolicy::polling(),
            start_workers: START_WORKERS,
            monitor_workers: None,
            ledger: Arc::new(BackupLedger::new()),
        }
    }

    /// Build the AWS session and clients described by `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the account cannot be resolved or a client cannot
    /// be built
    pub async fn connect(config: &VaultConfig) -> Result<Self> {
        let context = AwsContext::connect(&config.aws).await?;
        let service = Arc::new(context.export_service(config.export.download_timeout())?);

        let sink = match config.storage.bucket() {
            Some(bucket) => ArtifactSink::object_store(
                Arc::new(context.object_store()),
                bucket,
                config.storage.s3_key_prefix.clone(),
                &config.storage.backup_dir,
            ),
            None => ArtifactSink::local(&config.storage.backup_dir),
        };

        Ok(Self::new(service, sink, context.account_id().clone())
            .with_export_config(&config.export))
    }

    /// Apply retry budgets and worker counts from configuration
    pub fn with_export_config(self, export: &ExportConfig) -> Self {
        self.with_submission_policy(BackoffPolicy::new(
            export.start_max_attempts,
            export.start_base_delay(),
        ))
        .with_polling_policy(BackoffPolicy::new(
            export.poll_max_attempts,
            export.poll_base_delay(),
        ))
        .with_start_workers(export.start_workers)
        .with_monitor_workers(export.monitor_workers)
    }

    pub fn with_submission_policy(mut self, policy: BackoffPolicy) -> Self {
        self.submission_policy = policy;
        self
    }

    pub fn with_polling_policy(mut self, policy: BackoffPolicy) -> Self {
        self.polling_policy = policy;
        self
    }

    pub fn with_start_workers(mut self, workers: usize) -> Self {
        self.start_workers = workers;
        self
    }

    pub fn with_monitor_workers(mut self, workers: Option<usize>) -> Self {
        self.monitor_workers = workers;
        self
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account
    }

    /// The run's ledger
    pub fn ledger(&self) -> Arc<BackupLedger> {
        Arc::clone(&self.ledger)
    }

    /// Dashboards a backup would export
    pub async fn plan(&self) -> Vec<ExportableItem> {
        self.service.list_exportable_items(&self.account).await
    }

    /// Execute a backup run
    ///
    /// 1. Clears the ledger
    /// 2. Enumerates dashboards
    /// 3. Starts export jobs and records dashboards that could not start
    /// 4. Monitors started jobs and records their outcomes
    /// 5. Builds the report
    ///
    /// Per-dashboard failures never abort the run.
    ///
    /// # Errors
    ///
    /// Returns an error only when the local backup directory cannot be created
    pub async fn execute_backup(&self) -> Result<BackupReport> {
        let span = tracing::info_span!(
            "backup_run",
            run_id = %Uuid::new_v4(),
            account_id = %self.account
        );
        self.run().instrument(span).await
    }

    async fn run(&self) -> Result<BackupReport> {
        let start_time = Instant::now();
        self.ledger.clear();

        tracing::info!(destination = %self.sink.describe(), "Starting QuickSight dashboard backup");
        self.sink.prepare().await?;

        let items = self.plan().await;
        if items.is_empty() {
            tracing::info!("No dashboards found to backup");
            return Ok(self.report(start_time.elapsed()));
        }

        let submission = SubmissionStage::new(Arc::clone(&self.service), self.account.clone())
            .with_policy(self.submission_policy)
            .with_workers(self.start_workers)
            .run(items)
            .await;

        self.ledger.extend(submission.failed);

        if submission.jobs.is_empty() {
            tracing::info!("No jobs to monitor");
            return Ok(self.report(start_time.elapsed()));
        }

        MonitoringStage::new(
            Arc::clone(&self.service),
            self.sink.clone(),
            self.account.clone(),
        )
        .with_policy(self.polling_policy)
        .with_workers(self.monitor_workers)
        .run(submission.jobs, self.ledger())
        .await;

        let report = self.report(start_time.elapsed());
        tracing::info!(
            "Backup completed in {:.1} seconds",
            report.duration.as_secs_f64()
        );
        Ok(report)
    }

    fn report(&self, duration: Duration) -> BackupReport {
        BackupReport::from_outcomes(
            self.account.as_str(),
            self.ledger.snapshot(),
            duration,
            self.sink.describe(),
        )
    }
}
