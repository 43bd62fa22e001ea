// qsvault - QuickSight dashboard backup tool
// Copyright (c) 2025 qsvault Contributors
// Licensed under the MIT License

//! # qsvault - QuickSight dashboard backup
//!
//! qsvault backs up every dashboard in an Amazon QuickSight account by
//! requesting asset-bundle export jobs, polling them to completion and storing
//! the resulting `.qs` bundles in Amazon S3 or a local directory.
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Backup pipeline (submission, monitoring, ledger, report)
//! - [`adapters`] - External integrations (QuickSight, S3, HTTP download)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use qsvault::config::load_config_or_env;
//! use qsvault::core::backup::BackupCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config_or_env("qsvault.toml")?;
//!     let coordinator = BackupCoordinator::connect(&config).await?;
//!
//!     let report = coordinator.execute_backup().await?;
//!     println!("{}", report.render());
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! Export jobs are started by a small worker pool, since QuickSight admits
//! only five concurrent export jobs per account; admission rejections are
//! retried with exponential backoff. Started jobs are then polled by a second
//! pool and finished bundles are downloaded and persisted. Every dashboard
//! ends the run with exactly one [`domain::BackupStatus`].
//!
//! ## Testing
//!
//! The pipeline depends on [`adapters::quicksight::ExportService`] and
//! [`adapters::storage::ObjectStore`], so it can run against in-memory
//! implementations:
//!
//! ```rust,no_run
//! use qsvault::adapters::quicksight::ExportService;
//! use qsvault::adapters::storage::ArtifactSink;
//! use qsvault::core::backup::BackupCoordinator;
//! use qsvault::domain::AccountId;
//! use std::sync::Arc;
//!
//! # async fn example(service: Arc<dyn ExportService>) -> Result<(), Box<dyn std::error::Error>> {
//! let coordinator = BackupCoordinator::new(
//!     service,
//!     ArtifactSink::local("backup"),
//!     AccountId::new("123456789012")?,
//! );
//! let report = coordinator.execute_backup().await?;
//! assert_eq!(report.total, report.outcomes.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
