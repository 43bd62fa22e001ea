//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG_ERROR, EXIT_FATAL, EXIT_SUCCESS};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "qsvault.toml")]
    pub output: String,

    /// Include example values and comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing qsvault configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set s3_bucket, or leave it unset to keep bundles in backup_dir");
                println!("  3. Make AWS credentials available (profile, environment or role)");
                println!("  4. Validate configuration: qsvault validate-config");
                println!("  5. Preview dashboards: qsvault list");
                println!("  6. Run backup: qsvault backup");
                println!();
                Ok(EXIT_SUCCESS)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# qsvault Configuration File
# QuickSight dashboard backup

[application]
log_level = "info"

[aws]
region = "us-east-1"
# profile_name = "backup"
# account_id = "123456789012"

[storage]
# s3_bucket = "my-quicksight-backups"
s3_key_prefix = "quicksight"
backup_dir = "backup"

[export]
start_workers = 3

[logging]
local_enabled = false
local_path = "logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples() -> String {
        r#"# qsvault Configuration File
# QuickSight dashboard backup
#
# Every setting has a default; delete what you don't need.
# Values may reference environment variables with ${VAR_NAME}, and any
# setting can be overridden with QSVAULT_<SECTION>_<KEY>, for example
# QSVAULT_STORAGE_S3_BUCKET.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# AWS Session
# ============================================================================
[aws]
# Region hosting the QuickSight account
region = "us-east-1"

# Named profile from ~/.aws/config (default credential chain when unset)
# profile_name = "backup"

# Account to back up (resolved from the caller identity when unset)
# account_id = "123456789012"

# ============================================================================
# Storage
# ============================================================================
[storage]
# S3 bucket for bundles; when unset, bundles are written to backup_dir
# s3_bucket = "${QS_BACKUP_BUCKET}"

# Objects are stored as <prefix>/<YYYY-MM-DD>/<dashboard>.qs
s3_key_prefix = "quicksight"

# Local directory, also used when an S3 upload fails
backup_dir = "backup"

# ============================================================================
# Export Jobs
# ============================================================================
[export]
# QuickSight runs at most 5 export jobs per account at a time
start_workers = 3

# Attempts to start a job while the account is at its job limit,
# waiting start_base_delay_secs * 2^attempt between attempts
start_max_attempts = 10
start_base_delay_secs = 5

# Status checks per job, waiting poll_base_delay_secs * 2^attempt between
# checks
poll_max_attempts = 7
poll_base_delay_secs = 4

# Concurrent job monitors (default: min(32, started jobs))
# monitor_workers = 16

# Bundle download timeout
download_timeout_secs = 300

# ============================================================================
# Logging
# ============================================================================
[logging]
# Write JSON logs to local_path in addition to the console
local_enabled = false
local_path = "logs"

# Rotation: daily | hourly
local_rotation = "daily"
"#
        .to_string()
    }
}
