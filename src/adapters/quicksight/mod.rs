//! QuickSight export jobs
//!
//! [`ExportService`] is the seam between the backup pipeline and the remote
//! service; [`QuickSightClient`] implements it over the AWS SDK.

pub mod client;
pub mod traits;

pub use client::QuickSightClient;
pub use traits::{ExportService, JobLifecycle, JobStartResult, JobStatusSnapshot};
