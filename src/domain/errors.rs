//! Domain error types
//!
//! This module defines the error hierarchy for qsvault.
//! Errors are domain-specific and don't expose AWS SDK or HTTP client types.

use thiserror::Error;

/// Main qsvault error type
///
/// Only run-level failures surface as `VaultError`. Per-dashboard failures are
/// absorbed by the pipeline stages and recorded as outcomes instead.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// QuickSight export job errors
    #[error("QuickSight error: {0}")]
    QuickSight(#[from] ExportJobError),

    /// Artifact storage errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Caller identity could not be resolved
    #[error("Identity error: {0}")]
    Identity(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

/// Errors returned when starting an export job
///
/// The remote service caps the number of concurrently running export jobs per
/// account. Exceeding that cap yields [`ExportJobError::LimitExceeded`], the
/// only variant the submission stage retries.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExportJobError {
    /// Too many export jobs already in progress for the account
    #[error("Export job limit exceeded: {0}")]
    LimitExceeded(String),

    /// Caller is not allowed to export the resource
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The dashboard no longer exists
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    /// The request was rejected as malformed
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API request rate throttled
    #[error("Request throttled: {0}")]
    Throttled(String),

    /// Any other modeled service error
    #[error("Service error: {0}")]
    Service(String),

    /// The request never produced a service response
    #[error("Transport error: {0}")]
    Transport(String),
}

impl ExportJobError {
    /// Whether this error is the service's concurrent-job admission limit
    pub fn is_admission_limit(&self) -> bool {
        matches!(self, ExportJobError::LimitExceeded(_))
    }
}

/// Artifact download and persistence errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StorageError {
    /// Download URL is missing or not http(s)
    #[error("Invalid download URL: {0}")]
    InvalidUrl(String),

    /// The artifact request failed before a response arrived
    #[error("Download failed: {0}")]
    Download(String),

    /// The artifact request returned a non-200 status
    #[error("Download returned HTTP {0}")]
    HttpStatus(u16),

    /// Object storage upload failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Local file write failed
    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },
}

// Conversion from std::io::Error
impl From<std::io::Error> for VaultError {
    fn from(err: std::io::Error) -> Self {
        VaultError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for VaultError {
    fn from(err: serde_json::Error) -> Self {
        VaultError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for VaultError {
    fn from(err: toml::de::Error) -> Self {
        VaultError::Configuration(format!("TOML parse error: {err}"))
    }
}
