//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the qsvault configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_SUCCESS};
use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates before returning
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Account: {}",
            config
                .aws
                .account_id
                .as_deref()
                .unwrap_or("(resolved from caller identity)")
        );
        println!(
            "  Profile: {}",
            config.aws.profile_name.as_deref().unwrap_or("default")
        );
        println!("  Region: {}", config.aws.region);
        match config.storage.bucket() {
            Some(bucket) => {
                println!("  Destination: s3://{bucket}/{}", config.storage.s3_key_prefix);
                println!("  Fallback Directory: {}", config.storage.backup_dir);
            }
            None => println!("  Destination: {}/", config.storage.backup_dir),
        }
        println!(
            "  Start Workers: {} ({} attempts, {}s base delay)",
            config.export.start_workers,
            config.export.start_max_attempts,
            config.export.start_base_delay_secs
        );
        println!(
            "  Monitor Workers: {} ({} polls, {}s base delay)",
            config
                .export
                .monitor_workers
                .map(|w| w.to_string())
                .unwrap_or_else(|| "auto".to_string()),
            config.export.poll_max_attempts,
            config.export.poll_base_delay_secs
        );
        println!("  Download Timeout: {}s", config.export.download_timeout_secs);
        println!();
        Ok(EXIT_SUCCESS)
    }
}
