//! Shared test doubles for the backup pipeline

#![allow(dead_code)]

use async_trait::async_trait;
use qsvault::adapters::quicksight::{ExportService, JobLifecycle, JobStartResult, JobStatusSnapshot};
use qsvault::adapters::storage::ObjectStore;
use qsvault::domain::{
    AccountId, ExportJobError, ExportableItem, JobId, ResourceArn, StorageError,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const ACCOUNT: &str = "123456789012";

pub fn account() -> AccountId {
    AccountId::new(ACCOUNT).unwrap()
}

pub fn arn(dashboard_id: &str) -> String {
    format!("arn:aws:quicksight:us-east-1:{ACCOUNT}:dashboard/{dashboard_id}")
}

/// Dashboard with an ARN whose trailing segment is `id`
pub fn dashboard(id: &str, name: &str) -> ExportableItem {
    ExportableItem::new(id, name, Some(&arn(id)))
}

pub fn limit_exceeded() -> ExportJobError {
    ExportJobError::LimitExceeded("ResourceType: ASSET_BUNDLE_EXPORT_JOB".to_string())
}

pub fn in_progress() -> JobStatusSnapshot {
    JobStatusSnapshot::with_lifecycle(JobLifecycle::InProgress)
}

pub fn successful(job_id: &str) -> JobStatusSnapshot {
    JobStatusSnapshot::with_lifecycle(JobLifecycle::Successful)
        .with_download_url(format!("https://artifacts.example.com/{job_id}.qs"))
}

/// Scripted in-memory export service
///
/// Start attempts and status polls are scripted per job ID. The last scripted
/// poll repeats forever; unscripted jobs start and succeed immediately.
#[derive(Default)]
pub struct MockExportService {
    items: Vec<ExportableItem>,
    start_script: Mutex<HashMap<String, VecDeque<Result<(), ExportJobError>>>>,
    poll_script: Mutex<HashMap<String, VecDeque<JobStatusSnapshot>>>,
    fetch_error: Option<StorageError>,
    start_latency: Duration,
    start_calls: Mutex<HashMap<String, u32>>,
    describe_calls: Mutex<HashMap<String, u32>>,
    starts_in_flight: AtomicUsize,
    max_starts_in_flight: AtomicUsize,
}

impl MockExportService {
    pub fn new(items: Vec<ExportableItem>) -> Self {
        Self {
            items,
            ..Default::default()
        }
    }

    pub fn with_start_results(self, job_id: &str, results: Vec<Result<(), ExportJobError>>) -> Self {
        self.start_script
            .lock()
            .unwrap()
            .insert(job_id.to_string(), results.into());
        self
    }

    pub fn with_polls(self, job_id: &str, polls: Vec<JobStatusSnapshot>) -> Self {
        self.poll_script
            .lock()
            .unwrap()
            .insert(job_id.to_string(), polls.into());
        self
    }

    pub fn with_fetch_error(mut self, error: StorageError) -> Self {
        self.fetch_error = Some(error);
        self
    }

    pub fn with_start_latency(mut self, latency: Duration) -> Self {
        self.start_latency = latency;
        self
    }

    pub fn start_calls(&self, job_id: &str) -> u32 {
        self.start_calls.lock().unwrap().get(job_id).copied().unwrap_or(0)
    }

    pub fn total_start_calls(&self) -> u32 {
        self.start_calls.lock().unwrap().values().sum()
    }

    pub fn describe_calls(&self, job_id: &str) -> u32 {
        self.describe_calls.lock().unwrap().get(job_id).copied().unwrap_or(0)
    }

    pub fn max_starts_in_flight(&self) -> usize {
        self.max_starts_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExportService for MockExportService {
    async fn list_exportable_items(&self, _account: &AccountId) -> Vec<ExportableItem> {
        self.items.clone()
    }

    async fn start_export_job(
        &self,
        _account: &AccountId,
        job_id: &JobId,
        _resource_arn: &ResourceArn,
    ) -> Result<JobStartResult, ExportJobError> {
        *self
            .start_calls
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_insert(0) += 1;

        let in_flight = self.starts_in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_starts_in_flight.fetch_max(in_flight, Ordering::SeqCst);
        if !self.start_latency.is_zero() {
            tokio::time::sleep(self.start_latency).await;
        }
        self.starts_in_flight.fetch_sub(1, Ordering::SeqCst);

        let scripted = self
            .start_script
            .lock()
            .unwrap()
            .get_mut(job_id.as_str())
            .and_then(|queue| queue.pop_front());

        match scripted {
            Some(Err(e)) => Err(e),
            _ => Ok(JobStartResult {
                http_status: 200,
                job_id: job_id.clone(),
                job_arn: Some(format!("arn:aws:quicksight:us-east-1:{ACCOUNT}:asset-bundle-export-job/{job_id}")),
            }),
        }
    }

    async fn describe_export_job(&self, _account: &AccountId, job_id: &JobId) -> JobStatusSnapshot {
        *self
            .describe_calls
            .lock()
            .unwrap()
            .entry(job_id.to_string())
            .or_insert(0) += 1;

        let mut script = self.poll_script.lock().unwrap();
        match script.get_mut(job_id.as_str()) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) if !queue.is_empty() => queue[0].clone(),
            _ => successful(job_id.as_str()),
        }
    }

    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        match &self.fetch_error {
            Some(e) => Err(e.clone()),
            None => Ok(format!("bundle from {url}").into_bytes()),
        }
    }
}

/// Object store that rejects every upload
#[derive(Default)]
pub struct RejectingStore {
    pub attempts: AtomicUsize,
}

#[async_trait]
impl ObjectStore for RejectingStore {
    async fn put_object(
        &self,
        bucket: &str,
        _key: &str,
        _body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::Upload(format!("AccessDenied: s3:PutObject on {bucket}")))
    }
}

/// Object store that keeps uploads in memory
#[derive(Default)]
pub struct MemoryStore {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl ObjectStore for MemoryStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .insert(format!("{bucket}/{key}"), body);
        Ok(())
    }
}
