//! Domain models and types for qsvault.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`AccountId`], [`ResourceArn`], [`JobId`])
//! - **Pipeline records** ([`ExportableItem`], [`SubmissionRequest`], [`JobHandle`])
//! - **Outcomes** ([`JobOutcome`], [`BackupStatus`], [`StoredArtifact`])
//! - **Error types** ([`VaultError`], [`ExportJobError`], [`StorageError`])
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! ```rust
//! use qsvault::domain::{AccountId, JobId, ResourceArn};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let account = AccountId::new("123456789012")?;
//! let arn = ResourceArn::new("arn:aws:quicksight:us-east-1:123456789012:dashboard/ops")?;
//! let job_id = JobId::from_resource_arn(&arn, 1);
//! assert_eq!(job_id.as_str(), "ops");
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod item;
pub mod outcome;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{ExportJobError, StorageError, VaultError};
pub use ids::{AccountId, JobId, ResourceArn};
pub use item::{ExportableItem, JobHandle, Position, SubmissionRequest};
pub use outcome::{ArtifactLocation, BackupStatus, JobOutcome, StoredArtifact};
pub use result::Result;
