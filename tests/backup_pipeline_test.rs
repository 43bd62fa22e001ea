//! Integration tests for the two-stage backup pipeline

mod common;

use async_trait::async_trait;
use common::*;
use qsvault::adapters::quicksight::{
    ExportService, JobLifecycle, JobStartResult, JobStatusSnapshot,
};
use qsvault::adapters::storage::ArtifactSink;
use qsvault::core::backup::{
    BackoffPolicy, BackupCoordinator, BackupLedger, MonitoringStage, SubmissionStage,
};
use qsvault::domain::{
    AccountId, BackupStatus, ExportJobError, ExportableItem, JobHandle, JobId, Position, ResourceArn,
    StorageError,
};
use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

fn job(job_id: &str, name: &str) -> JobHandle {
    JobHandle {
        job_id: JobId::from_resource_arn(&ResourceArn::new(arn(job_id)).unwrap(), 1),
        name: name.to_string(),
        position: Position::new(1, 1),
    }
}

/// Paused-clock elapsed time, to the second
fn assert_elapsed(start: tokio::time::Instant, secs: u64) {
    let elapsed = start.elapsed();
    assert!(
        elapsed >= Duration::from_secs(secs) && elapsed < Duration::from_secs(secs + 1),
        "expected {secs}s of backoff, got {elapsed:?}"
    );
}

fn local_coordinator(service: Arc<MockExportService>, dir: &TempDir) -> BackupCoordinator {
    BackupCoordinator::new(service, ArtifactSink::local(dir.path()), account())
}

#[tokio::test]
async fn test_empty_account_yields_empty_ledger() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(MockExportService::new(vec![]));
    let coordinator = local_coordinator(Arc::clone(&service), &dir);

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(report.total, 0);
    assert!(report.outcomes.is_empty());
    assert!(coordinator.ledger().is_empty());
    assert_eq!(service.total_start_calls(), 0);
}

#[tokio::test]
async fn test_single_dashboard_is_saved_locally() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(MockExportService::new(vec![dashboard("sales", "Sales: EMEA")]));
    let coordinator = local_coordinator(service, &dir);

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(report.total, 1);
    assert_eq!(report.successful, 1);
    let outcome = &report.outcomes[0];
    assert_eq!(outcome.status, BackupStatus::Success);
    let artifact = outcome.artifact.as_ref().unwrap();
    assert!(!artifact.location.is_fallback());

    let saved = std::fs::read(dir.path().join("Sales_ EMEA.qs")).unwrap();
    assert_eq!(saved, b"bundle from https://artifacts.example.com/sales.qs");
    assert_eq!(artifact.size_bytes, saved.len() as u64);
}

#[tokio::test(start_paused = true)]
async fn test_every_item_yields_exactly_one_outcome() {
    let dir = TempDir::new().unwrap();
    let mut items: Vec<ExportableItem> = (0..8)
        .map(|i| dashboard(&format!("d{i}"), &format!("Dashboard {i}")))
        .collect();
    items.push(ExportableItem::new("orphan", "Orphan", None));
    items.push(ExportableItem::new("nameless", "", None));

    let service = MockExportService::new(items)
        .with_start_results("d1", vec![Err(ExportJobError::AccessDenied("denied".into()))])
        .with_polls("d2", vec![in_progress()])
        .with_polls(
            "d3",
            vec![JobStatusSnapshot::with_lifecycle(JobLifecycle::Failed)],
        );
    let coordinator = local_coordinator(Arc::new(service), &dir);

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(report.total, 10);
    assert_eq!(coordinator.ledger().len(), 10);
    let names: HashSet<_> = report.outcomes.iter().map(|o| o.name.clone()).collect();
    assert_eq!(names.len(), 10);
    assert!(names.contains("Unknown"));

    let counts = coordinator.ledger().counts();
    assert_eq!(counts[&BackupStatus::Success], 5);
    assert_eq!(counts[&BackupStatus::MissingArn], 2);
    assert_eq!(counts[&BackupStatus::ExportStartFailed], 1);
    assert_eq!(counts[&BackupStatus::Timeout], 1);
    assert_eq!(counts[&BackupStatus::Failed], 1);
    assert_eq!(report.successful + report.failed, report.total);
}

#[tokio::test(start_paused = true)]
async fn test_admission_limit_gives_up_after_ten_attempts() {
    let service = Arc::new(
        MockExportService::new(vec![]).with_start_results("busy", vec![Err(limit_exceeded()); 20]),
    );
    let stage = SubmissionStage::new(service.clone(), account());

    let start = tokio::time::Instant::now();
    let report = stage.run(vec![dashboard("busy", "Busy")]).await;

    assert!(report.jobs.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].status, BackupStatus::ExportStartFailed);
    assert_eq!(service.start_calls("busy"), 10);
    // 5 * (2^0 + ... + 2^8) seconds, no sleep after the final attempt
    assert_elapsed(start, 2555);
}

#[tokio::test(start_paused = true)]
async fn test_admission_limit_recovers_within_budget() {
    let service = Arc::new(
        MockExportService::new(vec![])
            .with_start_results("busy", vec![Err(limit_exceeded()), Err(limit_exceeded())]),
    );
    let stage = SubmissionStage::new(service.clone(), account());

    let start = tokio::time::Instant::now();
    let report = stage.run(vec![dashboard("busy", "Busy")]).await;

    assert_eq!(report.jobs.len(), 1);
    assert_eq!(report.jobs[0].job_id.as_str(), "busy");
    assert_eq!(service.start_calls("busy"), 3);
    assert_elapsed(start, 15);
}

#[tokio::test]
async fn test_other_start_errors_are_not_retried() {
    let service = Arc::new(MockExportService::new(vec![]).with_start_results(
        "gone",
        vec![Err(ExportJobError::ResourceNotFound("dashboard deleted".into()))],
    ));
    let stage = SubmissionStage::new(service.clone(), account());

    let report = stage.run(vec![dashboard("gone", "Gone")]).await;

    assert_eq!(service.start_calls("gone"), 1);
    assert_eq!(report.failed[0].status, BackupStatus::ExportStartFailed);
    assert!(report.failed[0]
        .message
        .as_deref()
        .unwrap()
        .contains("dashboard deleted"));
}

#[tokio::test]
async fn test_missing_arn_makes_no_remote_call() {
    let service = Arc::new(MockExportService::new(vec![]));
    let stage = SubmissionStage::new(service.clone(), account());

    let report = stage
        .run(vec![ExportableItem::new("legacy", "Legacy", None)])
        .await;

    assert_eq!(report.failed[0].status, BackupStatus::MissingArn);
    assert_eq!(service.total_start_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_submission_never_exceeds_worker_bound() {
    let items: Vec<_> = (0..12)
        .map(|i| dashboard(&format!("d{i}"), &format!("D{i}")))
        .collect();
    let service = Arc::new(
        MockExportService::new(vec![]).with_start_latency(Duration::from_secs(1)),
    );
    let stage = SubmissionStage::new(service.clone(), account());

    let report = stage.run(items).await;

    assert_eq!(report.jobs.len(), 12);
    assert!(service.max_starts_in_flight() <= 3);
    assert!(service.max_starts_in_flight() >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_perpetually_running_job_times_out_after_seven_polls() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(MockExportService::new(vec![]).with_polls("slow", vec![in_progress()]));
    let stage = MonitoringStage::new(service.clone(), ArtifactSink::local(dir.path()), account());

    let start = tokio::time::Instant::now();
    let outcome = stage.monitor(&job("slow", "Slow")).await;

    assert_eq!(outcome.status, BackupStatus::Timeout);
    assert_eq!(service.describe_calls("slow"), 7);
    // 4 * (2^0 + ... + 2^6) seconds
    assert_elapsed(start, 508);
}

#[tokio::test(start_paused = true)]
async fn test_queued_then_successful_job_is_downloaded() {
    let dir = TempDir::new().unwrap();
    let queued = JobStatusSnapshot::with_lifecycle(JobLifecycle::Queued);
    let service = Arc::new(
        MockExportService::new(vec![])
            .with_polls("q", vec![queued, in_progress(), successful("q")]),
    );
    let stage = MonitoringStage::new(service.clone(), ArtifactSink::local(dir.path()), account());

    let outcome = stage.monitor(&job("q", "Queued")).await;

    assert_eq!(outcome.status, BackupStatus::Success);
    assert_eq!(service.describe_calls("q"), 3);
    assert!(dir.path().join("Queued.qs").exists());
}

#[tokio::test]
async fn test_failed_job_reports_first_error_message() {
    let dir = TempDir::new().unwrap();
    let failed = JobStatusSnapshot::with_lifecycle(JobLifecycle::Failed)
        .with_error("quota exceeded")
        .with_error("second error");
    let service = Arc::new(
        MockExportService::new(vec![])
            .with_polls("f", vec![failed])
            .with_polls("g", vec![JobStatusSnapshot::with_lifecycle(JobLifecycle::Failed)]),
    );
    let stage = MonitoringStage::new(service, ArtifactSink::local(dir.path()), account());

    let outcome = stage.monitor(&job("f", "F")).await;
    assert_eq!(outcome.status, BackupStatus::Failed);
    assert_eq!(outcome.message.as_deref(), Some("quota exceeded"));

    let outcome = stage.monitor(&job("g", "G")).await;
    assert_eq!(outcome.message.as_deref(), Some("Unknown error"));
}

#[tokio::test]
async fn test_http_error_and_unexpected_status() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(
        MockExportService::new(vec![])
            .with_polls("t", vec![JobStatusSnapshot::transport_error()])
            .with_polls(
                "u",
                vec![JobStatusSnapshot::with_lifecycle(JobLifecycle::parse("CANCELLED"))],
            ),
    );
    let stage = MonitoringStage::new(service.clone(), ArtifactSink::local(dir.path()), account());

    let outcome = stage.monitor(&job("t", "T")).await;
    assert_eq!(outcome.status, BackupStatus::Error);
    assert_eq!(service.describe_calls("t"), 1);

    let outcome = stage.monitor(&job("u", "U")).await;
    assert_eq!(outcome.status, BackupStatus::UnexpectedStatus);
    assert!(outcome.message.unwrap().contains("CANCELLED"));
}

#[tokio::test]
async fn test_download_failures() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(
        MockExportService::new(vec![])
            .with_polls(
                "nourl",
                vec![JobStatusSnapshot::with_lifecycle(JobLifecycle::Successful)],
            )
            .with_fetch_error(StorageError::HttpStatus(403)),
    );
    let stage = MonitoringStage::new(service, ArtifactSink::local(dir.path()), account());

    let outcome = stage.monitor(&job("nourl", "No URL")).await;
    assert_eq!(outcome.status, BackupStatus::DownloadFailed);

    let outcome = stage.monitor(&job("denied", "Denied")).await;
    assert_eq!(outcome.status, BackupStatus::DownloadFailed);
    assert!(outcome.message.unwrap().contains("403"));
}

#[tokio::test]
async fn test_failed_upload_is_saved_locally_and_still_successful() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(RejectingStore::default());
    let sink = ArtifactSink::object_store(store.clone(), "qs-backups", "daily/", dir.path());
    let service = Arc::new(MockExportService::new(vec![dashboard("ops", "Ops")]));
    let coordinator = BackupCoordinator::new(service, sink, account());

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(store.attempts.load(Ordering::SeqCst), 1);
    assert_eq!(report.successful, 1);
    assert_eq!(report.fallback_saves, 1);
    assert_eq!(report.destination, "s3://qs-backups/daily/");
    assert!(report.outcomes[0].artifact.as_ref().unwrap().location.is_fallback());
    assert!(dir.path().join("Ops.qs").exists());
}

#[tokio::test]
async fn test_uploads_go_to_dated_keys() {
    let dir = TempDir::new().unwrap();
    let store = Arc::new(MemoryStore::default());
    let sink = ArtifactSink::object_store(store.clone(), "qs-backups", "", dir.path());
    let service = Arc::new(MockExportService::new(vec![dashboard("ops", "Ops")]));
    let coordinator = BackupCoordinator::new(service, sink, account());

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(report.successful, 1);
    let objects = store.objects.lock().unwrap();
    let key = objects.keys().next().unwrap().clone();
    assert!(key.starts_with("qs-backups/"));
    assert!(key.ends_with("/Ops.qs"));
    assert!(!dir.path().join("Ops.qs").exists());
}

#[tokio::test(start_paused = true)]
async fn test_end_to_end_mixed_outcomes() {
    let dir = TempDir::new().unwrap();
    let mut c_starts = vec![Err(limit_exceeded()); 9];
    c_starts.push(Ok(()));

    let service = Arc::new(
        MockExportService::new(vec![
            ExportableItem::new("a", "A", None),
            dashboard("b", "B"),
            dashboard("c", "C"),
        ])
        .with_start_results("c", c_starts)
        .with_polls(
            "c",
            vec![JobStatusSnapshot::with_lifecycle(JobLifecycle::Failed).with_error("quota exceeded")],
        ),
    );
    let coordinator = local_coordinator(service.clone(), &dir);

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.successful, 1);
    assert_eq!(report.failed, 2);
    assert_eq!(service.start_calls("c"), 10);

    let status_of = |name: &str| {
        report
            .outcomes
            .iter()
            .find(|o| o.name == name)
            .map(|o| o.status)
            .unwrap()
    };
    assert_eq!(status_of("A"), BackupStatus::MissingArn);
    assert_eq!(status_of("B"), BackupStatus::Success);
    assert_eq!(status_of("C"), BackupStatus::Failed);

    let rendered = report.render();
    assert!(rendered.contains("C - FAILED: quota exceeded"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_thirty_two_jobs_completing_together() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(MockExportService::new(vec![]));
    let stage = MonitoringStage::new(service, ArtifactSink::local(dir.path()), account());
    let jobs: Vec<JobHandle> = (0..32)
        .map(|i| JobHandle {
            job_id: JobId::from_resource_arn(&ResourceArn::new(arn(&format!("d{i}"))).unwrap(), i),
            name: format!("Dashboard {i}"),
            position: Position::new(i + 1, 32),
        })
        .collect();
    assert_eq!(stage.worker_count(jobs.len()), 32);

    let ledger = Arc::new(BackupLedger::new());
    stage.run(jobs, Arc::clone(&ledger)).await;

    let outcomes = ledger.snapshot();
    assert_eq!(outcomes.len(), 32);
    let names: HashSet<_> = outcomes.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names.len(), 32);
    assert!(outcomes.iter().all(|o| o.status == BackupStatus::Success));
}

#[tokio::test(start_paused = true)]
async fn test_configured_policies_are_applied() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(
        MockExportService::new(vec![dashboard("busy", "Busy"), dashboard("slow", "Slow")])
            .with_start_results("busy", vec![Err(limit_exceeded()); 5])
            .with_polls("slow", vec![in_progress()]),
    );
    let coordinator = local_coordinator(service.clone(), &dir)
        .with_submission_policy(BackoffPolicy::new(2, Duration::from_secs(1)))
        .with_polling_policy(BackoffPolicy::new(3, Duration::from_secs(1)))
        .with_start_workers(1)
        .with_monitor_workers(Some(1));

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(service.start_calls("busy"), 2);
    assert_eq!(service.describe_calls("slow"), 3);
    assert_eq!(report.failed, 2);
}

#[test]
fn test_monitor_worker_count() {
    let service = Arc::new(MockExportService::new(vec![]));
    let stage = MonitoringStage::new(service, ArtifactSink::local("unused"), account());
    assert_eq!(stage.worker_count(0), 1);
    assert_eq!(stage.worker_count(5), 5);
    assert_eq!(stage.worker_count(100), 32);
    assert_eq!(stage.clone().with_workers(Some(64)).worker_count(5), 64);
}

/// Export service whose calls panic for chosen jobs
struct PanickingService {
    inner: MockExportService,
    panic_on_start: &'static str,
    panic_on_describe: &'static str,
}

#[async_trait]
impl ExportService for PanickingService {
    async fn list_exportable_items(&self, account: &AccountId) -> Vec<ExportableItem> {
        self.inner.list_exportable_items(account).await
    }

    async fn start_export_job(
        &self,
        account: &AccountId,
        job_id: &JobId,
        resource_arn: &ResourceArn,
    ) -> Result<JobStartResult, ExportJobError> {
        if job_id.as_str() == self.panic_on_start {
            panic!("start_export_job blew up for {job_id}");
        }
        self.inner.start_export_job(account, job_id, resource_arn).await
    }

    async fn describe_export_job(&self, account: &AccountId, job_id: &JobId) -> JobStatusSnapshot {
        if job_id.as_str() == self.panic_on_describe {
            panic!("describe_export_job blew up for {job_id}");
        }
        self.inner.describe_export_job(account, job_id).await
    }

    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        self.inner.fetch_artifact(url).await
    }
}

#[tokio::test]
async fn test_panicking_workers_still_record_outcomes() {
    let dir = TempDir::new().unwrap();
    let service = Arc::new(PanickingService {
        inner: MockExportService::new(vec![
            dashboard("boom1", "B1"),
            dashboard("ok", "OK"),
            dashboard("boom2", "B2"),
        ]),
        panic_on_start: "boom1",
        panic_on_describe: "boom2",
    });
    let coordinator = BackupCoordinator::new(service, ArtifactSink::local(dir.path()), account());

    let report = coordinator.execute_backup().await.unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(coordinator.ledger().len(), 3);
    let outcome_of = |name: &str| {
        report
            .outcomes
            .iter()
            .find(|o| o.name == name)
            .cloned()
            .unwrap()
    };

    let b1 = outcome_of("B1");
    assert_eq!(b1.status, BackupStatus::ExportStartFailed);
    assert!(b1.message.unwrap().contains("Submission task failed"));

    assert_eq!(outcome_of("OK").status, BackupStatus::Success);

    let b2 = outcome_of("B2");
    assert_eq!(b2.status, BackupStatus::Error);
    assert!(b2.message.unwrap().contains("Monitoring task failed"));
}
