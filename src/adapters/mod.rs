//! External system integrations for qsvault.
//!
//! - [`quicksight`] - export job client behind the [`quicksight::ExportService`] trait
//! - [`storage`] - artifact download, naming and persistence
//! - [`aws`] - session and client construction
//!
//! Adapters isolate the AWS SDK and HTTP client so the backup pipeline can be
//! exercised with in-memory implementations.
//!
//! ```rust,no_run
//! use qsvault::adapters::aws::AwsContext;
//! use qsvault::config::AwsConfig;
//! use std::time::Duration;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let context = AwsContext::connect(&AwsConfig::default()).await?;
//! let quicksight = context.export_service(Duration::from_secs(300))?;
//! # Ok(())
//! # }
//! ```

pub mod aws;
pub mod quicksight;
pub mod storage;
