//! Core business logic for qsvault.
//!
//! # Backup Workflow
//!
//! 1. **Enumerate**: list dashboards in the account
//! 2. **Submit**: start one asset-bundle export job per dashboard, retrying
//!    while the account is at its concurrent job limit
//! 3. **Monitor**: poll each job to a terminal state
//! 4. **Persist**: download finished bundles to S3 or a local directory
//! 5. **Report**: summarize one outcome per dashboard
//!
//! # Example
//!
//! ```rust,no_run
//! use qsvault::config::load_config;
//! use qsvault::core::backup::BackupCoordinator;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("qsvault.toml")?;
//! let coordinator = BackupCoordinator::connect(&config).await?;
//!
//! let report = coordinator.execute_backup().await?;
//! println!("Total: {}", report.total);
//! println!("Successful: {}", report.successful);
//! println!("Failed: {}", report.failed);
//! # Ok(())
//! # }
//! ```

pub mod backup;
