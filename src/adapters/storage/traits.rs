//! Object storage abstraction

use crate::domain::StorageError;
use async_trait::async_trait;

/// Content type used for every uploaded artifact
pub const ARTIFACT_CONTENT_TYPE: &str = "application/octet-stream";

/// Remote object storage
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Uploads `body` under `bucket/key`
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Upload`] when the upload is rejected or fails
    /// in transport.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
