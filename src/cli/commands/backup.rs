//! Backup command implementation
//!
//! Runs the full export pipeline for every dashboard in the account.

use super::{
    EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_FATAL, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS,
};
use crate::config::{load_config_or_env, VaultConfig};
use crate::core::backup::{BackupCoordinator, BackupReport};
use crate::log_error_with_context;
use clap::Args;

/// Arguments for the backup command
#[derive(Args, Debug, Default)]
pub struct BackupArgs {
    /// AWS account ID (resolved from the caller identity when omitted)
    #[arg(long)]
    pub account_id: Option<String>,

    /// S3 bucket for the exported bundles
    #[arg(long)]
    pub bucket: Option<String>,

    /// S3 key prefix placed before the date folder
    #[arg(long)]
    pub prefix: Option<String>,

    /// Local directory for bundles when S3 is not used or an upload fails
    #[arg(long)]
    pub backup_dir: Option<String>,

    /// Concurrent job monitors (default: min(32, started jobs))
    #[arg(long)]
    pub monitor_workers: Option<usize>,

    /// Print a JSON response instead of the text report
    #[arg(long)]
    pub json: bool,
}

impl BackupArgs {
    /// Execute the backup command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting backup command");

        let mut config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => return Ok(self.fail(&e, EXIT_CONFIG_ERROR)),
        };

        self.apply_overrides(&mut config);

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            return Ok(self.fail(&format!("Configuration validation failed: {e}"), EXIT_CONFIG_ERROR));
        }

        let coordinator = match BackupCoordinator::connect(&config).await {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to initialize backup");
                return Ok(self.fail(&e, EXIT_CONNECTION_ERROR));
            }
        };

        if !self.json {
            println!(
                "🚀 Backing up QuickSight dashboards for account {}",
                coordinator.account_id()
            );
            println!();
        }

        let report = match coordinator.execute_backup().await {
            Ok(report) => report,
            Err(e) => {
                log_error_with_context!(&e, "Backup run failed");
                return Ok(self.fail(&e, EXIT_FATAL));
            }
        };

        report.log_summary();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report.to_response())?);
        } else {
            println!("{}", report.render());
        }

        Ok(if report.is_successful() {
            EXIT_SUCCESS
        } else {
            EXIT_PARTIAL_FAILURE
        })
    }

    /// Applies command-line overrides on top of the loaded configuration
    pub fn apply_overrides(&self, config: &mut VaultConfig) {
        if let Some(account_id) = &self.account_id {
            tracing::info!(account_id = %account_id, "Overriding account ID from CLI");
            config.aws.account_id = Some(account_id.clone());
        }
        if let Some(bucket) = &self.bucket {
            tracing::info!(bucket = %bucket, "Overriding S3 bucket from CLI");
            config.storage.s3_bucket = Some(bucket.clone());
        }
        if let Some(prefix) = &self.prefix {
            config.storage.s3_key_prefix = prefix.clone();
        }
        if let Some(backup_dir) = &self.backup_dir {
            config.storage.backup_dir = backup_dir.clone();
        }
        if let Some(workers) = self.monitor_workers {
            config.export.monitor_workers = Some(workers);
        }
    }

    fn fail(&self, error: &dyn std::fmt::Display, code: i32) -> i32 {
        if self.json {
            println!("{}", BackupReport::error_response(error));
        } else {
            eprintln!("❌ Backup failed: {error}");
        }
        code
    }
}
