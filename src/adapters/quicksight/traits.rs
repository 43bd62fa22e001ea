//! Export service abstraction
//!
//! The pipeline talks to the remote export service only through
//! [`ExportService`], so stages can be driven by in-memory doubles in tests.

use crate::domain::ids::{AccountId, JobId, ResourceArn};
use crate::domain::{ExportJobError, ExportableItem, StorageError};
use async_trait::async_trait;
use std::fmt;

/// Lifecycle status reported by a describe call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobLifecycle {
    /// `QUEUED_FOR_IMMEDIATE_EXECUTION`
    Queued,
    /// `IN_PROGRESS`
    InProgress,
    /// `SUCCESSFUL`
    Successful,
    /// `FAILED`
    Failed,
    /// The describe call itself failed
    Error,
    /// Any status outside the known set
    Other(String),
}

impl JobLifecycle {
    /// Parses the service's status string
    pub fn parse(status: &str) -> Self {
        match status {
            "QUEUED_FOR_IMMEDIATE_EXECUTION" => JobLifecycle::Queued,
            "IN_PROGRESS" => JobLifecycle::InProgress,
            "SUCCESSFUL" => JobLifecycle::Successful,
            "FAILED" => JobLifecycle::Failed,
            "ERROR" => JobLifecycle::Error,
            other => JobLifecycle::Other(other.to_string()),
        }
    }

    /// Whether the job has not reached a terminal state yet
    pub fn is_pending(&self) -> bool {
        matches!(self, JobLifecycle::Queued | JobLifecycle::InProgress)
    }
}

impl fmt::Display for JobLifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobLifecycle::Queued => f.write_str("QUEUED_FOR_IMMEDIATE_EXECUTION"),
            JobLifecycle::InProgress => f.write_str("IN_PROGRESS"),
            JobLifecycle::Successful => f.write_str("SUCCESSFUL"),
            JobLifecycle::Failed => f.write_str("FAILED"),
            JobLifecycle::Error => f.write_str("ERROR"),
            JobLifecycle::Other(s) => f.write_str(s),
        }
    }
}

/// Acknowledgement of a started export job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStartResult {
    pub http_status: u16,
    pub job_id: JobId,
    /// ARN of the export job itself
    pub job_arn: Option<String>,
}

/// One observation of an export job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusSnapshot {
    pub http_status: u16,
    pub lifecycle: JobLifecycle,
    pub download_url: Option<String>,
    /// Error messages reported by the service, in order
    pub errors: Vec<String>,
}

impl JobStatusSnapshot {
    /// Snapshot returned when the describe call fails in transport
    pub fn transport_error() -> Self {
        Self {
            http_status: 500,
            lifecycle: JobLifecycle::Error,
            download_url: None,
            errors: Vec::new(),
        }
    }

    /// A 200 snapshot with the given lifecycle
    pub fn with_lifecycle(lifecycle: JobLifecycle) -> Self {
        Self {
            http_status: 200,
            lifecycle,
            download_url: None,
            errors: Vec::new(),
        }
    }

    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.download_url = Some(url.into());
        self
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.errors.push(message.into());
        self
    }
}

/// Remote export service
///
/// Implementations must be safe to share across worker tasks.
#[async_trait]
pub trait ExportService: Send + Sync {
    /// Enumerates exportable dashboards
    ///
    /// Never fails partially: any error yields an empty list and is logged.
    async fn list_exportable_items(&self, account: &AccountId) -> Vec<ExportableItem>;

    /// Starts an export job for one resource
    ///
    /// # Errors
    ///
    /// Returns [`ExportJobError::LimitExceeded`] when the account is at its
    /// concurrent job limit, and another variant for any other failure.
    async fn start_export_job(
        &self,
        account: &AccountId,
        job_id: &JobId,
        resource_arn: &ResourceArn,
    ) -> Result<JobStartResult, ExportJobError>;

    /// Describes an export job; transport failures yield
    /// [`JobStatusSnapshot::transport_error`]
    async fn describe_export_job(&self, account: &AccountId, job_id: &JobId) -> JobStatusSnapshot;

    /// Downloads a finished artifact
    ///
    /// # Errors
    ///
    /// Returns an error for non-http(s) URLs, transport failures and non-200
    /// responses.
    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, StorageError>;
}
