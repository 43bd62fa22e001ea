//! Artifact persistence
//!
//! The sink writes every artifact to one destination chosen at construction:
//! S3 when a bucket is configured, otherwise the local backup directory. A
//! failed upload falls back to the local directory for that artifact.

use super::sanitize::normalize_filename;
use super::traits::{ObjectStore, ARTIFACT_CONTENT_TYPE};
use crate::domain::{ArtifactLocation, StorageError, StoredArtifact};
use chrono::{NaiveDate, Utc};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Clone)]
struct RemoteTarget {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    prefix: String,
}

/// Persists artifact bytes under a name
///
/// # Example
///
/// ```no_run
/// use qsvault::adapters::storage::ArtifactSink;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let sink = ArtifactSink::local("backup");
/// let stored = sink.persist("Sales.qs", b"bundle".to_vec()).await?;
/// println!("saved to {}", stored.location);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ArtifactSink {
    remote: Option<RemoteTarget>,
    backup_dir: PathBuf,
}

impl ArtifactSink {
    /// Sink that writes only to `backup_dir`
    pub fn local(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote: None,
            backup_dir: backup_dir.into(),
        }
    }

    /// Sink that uploads to `bucket`, falling back to `backup_dir`
    pub fn object_store(
        store: Arc<dyn ObjectStore>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
        backup_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            remote: Some(RemoteTarget {
                store,
                bucket: bucket.into(),
                prefix: prefix.into(),
            }),
            backup_dir: backup_dir.into(),
        }
    }

    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Human-readable destination for reports
    pub fn describe(&self) -> String {
        match &self.remote {
            Some(target) => {
                let prefix = target.prefix.trim_end_matches('/');
                if prefix.is_empty() {
                    format!("s3://{}/", target.bucket)
                } else {
                    format!("s3://{}/{}/", target.bucket, prefix)
                }
            }
            None => format!("{}/", self.backup_dir.display()),
        }
    }

    /// Creates the local backup directory when the sink writes locally
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the directory cannot be created
    pub async fn prepare(&self) -> Result<(), StorageError> {
        if self.remote.is_none() {
            create_dir(&self.backup_dir).await?;
        }
        Ok(())
    }

    /// Persists `bytes` as `filename`
    ///
    /// The stem of `filename` is sanitized again before use. Upload failures
    /// are logged and the artifact is written locally instead.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] when the local write fails
    pub async fn persist(
        &self,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredArtifact, StorageError> {
        let filename = normalize_filename(filename);
        let size_bytes = bytes.len() as u64;
        let sha256 = format!("{:x}", Sha256::digest(&bytes));

        let mut fallback = false;
        if let Some(target) = &self.remote {
            let key = object_key_for_date(&target.prefix, Utc::now().date_naive(), &filename);
            match target
                .store
                .put_object(&target.bucket, &key, bytes.clone(), ARTIFACT_CONTENT_TYPE)
                .await
            {
                Ok(()) => {
                    tracing::info!(bucket = %target.bucket, key = %key, size_bytes, "Uploaded artifact");
                    return Ok(StoredArtifact {
                        location: ArtifactLocation::ObjectStore {
                            bucket: target.bucket.clone(),
                            key,
                        },
                        size_bytes,
                        sha256,
                    });
                }
                Err(e) => {
                    tracing::warn!(
                        bucket = %target.bucket,
                        key = %key,
                        error = %e,
                        "Upload failed, saving artifact locally"
                    );
                    fallback = true;
                }
            }
        }

        let path = self.write_local(&filename, &bytes).await?;
        tracing::info!(path = %path.display(), size_bytes, fallback, "Saved artifact locally");

        Ok(StoredArtifact {
            location: ArtifactLocation::Local {
                path: path.display().to_string(),
                fallback,
            },
            size_bytes,
            sha256,
        })
    }

    async fn write_local(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StorageError> {
        create_dir(&self.backup_dir).await?;
        let path = self.backup_dir.join(filename);
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| StorageError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(path)
    }
}

async fn create_dir(dir: &Path) -> Result<(), StorageError> {
    tokio::fs::create_dir_all(dir)
        .await
        .map_err(|e| StorageError::Write {
            path: dir.display().to_string(),
            message: e.to_string(),
        })
}

/// Object key for an artifact stored on `date`
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use qsvault::adapters::storage::object_key_for_date;
///
/// let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
/// assert_eq!(object_key_for_date("qs/", date, "Sales.qs"), "qs/2024-05-01/Sales.qs");
/// assert_eq!(object_key_for_date("", date, "Sales.qs"), "2024-05-01/Sales.qs");
/// ```
pub fn object_key_for_date(prefix: &str, date: NaiveDate, filename: &str) -> String {
    let folder = date.format("%Y-%m-%d");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        format!("{folder}/{filename}")
    } else {
        format!("{prefix}/{folder}/{filename}")
    }
}
