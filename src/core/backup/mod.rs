//! Dashboard backup pipeline
//!
//! - [`SubmissionStage`] - starts export jobs with admission-limit backoff
//! - [`MonitoringStage`] - polls jobs and persists finished artifacts
//! - [`BackupLedger`] - run-scoped outcome collection
//! - [`BackupCoordinator`] - sequences the stages and builds the [`BackupReport`]

pub mod backoff;
pub mod coordinator;
pub mod ledger;
pub mod monitoring;
pub mod report;
pub mod submission;

pub use backoff::{
    BackoffPolicy, POLL_BASE_DELAY, POLL_MAX_ATTEMPTS, START_BASE_DELAY, START_MAX_ATTEMPTS,
};
pub use coordinator::BackupCoordinator;
pub use ledger::BackupLedger;
pub use monitoring::{MonitoringStage, MAX_MONITOR_WORKERS, UNKNOWN_ERROR};
pub use report::BackupReport;
pub use submission::{SubmissionReport, SubmissionStage, START_WORKERS};
