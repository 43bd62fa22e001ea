//! Artifact download, naming and persistence
//!
//! - [`HttpArtifactFetcher`] - timed HTTP download of export artifacts
//! - [`sanitize_filename`] - file-system safe artifact names
//! - [`ArtifactSink`] - S3 upload with local fallback
//! - [`ObjectStore`] / [`S3ObjectStore`] - object storage seam

pub mod fetcher;
pub mod s3;
pub mod sanitize;
pub mod sink;
pub mod traits;

pub use fetcher::{validate_download_url, HttpArtifactFetcher, DOWNLOAD_TIMEOUT};
pub use s3::S3ObjectStore;
pub use sanitize::{
    artifact_filename, normalize_filename, sanitize_filename, ARTIFACT_EXTENSION,
    FALLBACK_NAME, FILENAME_MAX_LENGTH,
};
pub use sink::{object_key_for_date, ArtifactSink};
pub use traits::{ObjectStore, ARTIFACT_CONTENT_TYPE};
