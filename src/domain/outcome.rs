//! Terminal outcomes recorded for each dashboard in a run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Terminal status of a dashboard backup
///
/// Every enumerated dashboard ends a run with exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BackupStatus {
    /// Artifact downloaded and persisted
    Success,
    /// Dashboard summary carried no ARN; nothing was submitted
    MissingArn,
    /// Export job could not be started
    ExportStartFailed,
    /// Export succeeded but the artifact could not be fetched or stored
    DownloadFailed,
    /// The remote export job reported failure
    Failed,
    /// Polling the job failed at the transport level
    Error,
    /// The job reported a lifecycle status outside the known set
    UnexpectedStatus,
    /// Job still pending after the last polling attempt
    Timeout,
}

impl BackupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackupStatus::Success => "SUCCESS",
            BackupStatus::MissingArn => "MISSING_ARN",
            BackupStatus::ExportStartFailed => "EXPORT_START_FAILED",
            BackupStatus::DownloadFailed => "DOWNLOAD_FAILED",
            BackupStatus::Failed => "FAILED",
            BackupStatus::Error => "ERROR",
            BackupStatus::UnexpectedStatus => "UNEXPECTED_STATUS",
            BackupStatus::Timeout => "TIMEOUT",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, BackupStatus::Success)
    }
}

impl fmt::Display for BackupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an artifact ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArtifactLocation {
    /// Uploaded to S3
    ObjectStore { bucket: String, key: String },
    /// Written to the local backup directory; `fallback` is set when an
    /// upload was attempted first and failed
    Local { path: String, fallback: bool },
}

impl ArtifactLocation {
    pub fn is_fallback(&self) -> bool {
        matches!(self, ArtifactLocation::Local { fallback: true, .. })
    }
}

impl fmt::Display for ArtifactLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactLocation::ObjectStore { bucket, key } => write!(f, "s3://{bucket}/{key}"),
            ArtifactLocation::Local { path, .. } => write!(f, "{path}"),
        }
    }
}

/// A persisted artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredArtifact {
    pub location: ArtifactLocation,
    pub size_bytes: u64,
    /// Hex-encoded SHA-256 of the artifact bytes
    pub sha256: String,
}

/// One ledger entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    pub name: String,
    pub status: BackupStatus,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact: Option<StoredArtifact>,
}

impl JobOutcome {
    /// Creates an outcome stamped with the current time
    pub fn new(name: impl Into<String>, status: BackupStatus) -> Self {
        Self {
            name: name.into(),
            status,
            timestamp: Utc::now(),
            message: None,
            artifact: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_artifact(mut self, artifact: StoredArtifact) -> Self {
        self.artifact = Some(artifact);
        self
    }

    /// Timestamp formatted for reports
    pub fn display_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
