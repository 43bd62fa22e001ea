//! Configuration schema types
//!
//! This module defines the configuration structure for qsvault.

use crate::domain::AccountId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

/// Main qsvault configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section has defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// AWS account and session settings
    #[serde(default)]
    pub aws: AwsConfig,

    /// Artifact destination settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Export job submission and polling settings
    #[serde(default)]
    pub export: ExportConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VaultConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.aws.validate()?;
        self.storage.validate()?;
        self.export.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// AWS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Account to back up; resolved from the caller identity when absent
    #[serde(default)]
    pub account_id: Option<String>,

    /// Named profile from the shared AWS config files
    #[serde(default)]
    pub profile_name: Option<String>,

    /// Region hosting the QuickSight account
    #[serde(default = "default_region")]
    pub region: String,
}

impl AwsConfig {
    fn validate(&self) -> Result<(), String> {
        if self.region.trim().is_empty() {
            return Err("aws.region cannot be empty".to_string());
        }

        if let Some(account_id) = &self.account_id {
            AccountId::from_str(account_id).map_err(|e| format!("aws.account_id: {e}"))?;
        }

        Ok(())
    }
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            account_id: None,
            profile_name: None,
            region: default_region(),
        }
    }
}

/// Artifact destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// S3 bucket; when absent artifacts go to `backup_dir`
    #[serde(default)]
    pub s3_bucket: Option<String>,

    /// Key prefix placed before the date folder
    #[serde(default)]
    pub s3_key_prefix: String,

    /// Local directory used when S3 is not configured or an upload fails
    #[serde(default = "default_backup_dir")]
    pub backup_dir: String,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(bucket) = &self.s3_bucket {
            if bucket.trim().is_empty() {
                return Err("storage.s3_bucket cannot be blank when set".to_string());
            }
            if bucket.contains('/') {
                return Err(format!(
                    "storage.s3_bucket must be a bucket name, not a path: '{bucket}'"
                ));
            }
        }

        if self.backup_dir.trim().is_empty() {
            return Err("storage.backup_dir cannot be empty".to_string());
        }

        Ok(())
    }

    /// The configured bucket, ignoring blank values
    pub fn bucket(&self) -> Option<&str> {
        self.s3_bucket
            .as_deref()
            .map(str::trim)
            .filter(|b| !b.is_empty())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            s3_bucket: None,
            s3_key_prefix: String::new(),
            backup_dir: default_backup_dir(),
        }
    }
}

/// Export job settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Attempts to start a job while the account is at its job limit
    #[serde(default = "default_start_max_attempts")]
    pub start_max_attempts: u32,

    /// Base delay between start attempts, doubled per attempt
    #[serde(default = "default_start_base_delay_secs")]
    pub start_base_delay_secs: u64,

    /// Concurrent job submissions
    #[serde(default = "default_start_workers")]
    pub start_workers: usize,

    /// Status polls per job before giving up
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Base delay between polls, doubled per attempt
    #[serde(default = "default_poll_base_delay_secs")]
    pub poll_base_delay_secs: u64,

    /// Concurrent job monitors (default: min(32, started jobs))
    #[serde(default)]
    pub monitor_workers: Option<usize>,

    /// Artifact download timeout
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.start_max_attempts == 0 || self.start_max_attempts > 20 {
            return Err(format!(
                "export.start_max_attempts must be between 1 and 20, got {}",
                self.start_max_attempts
            ));
        }

        if self.poll_max_attempts == 0 || self.poll_max_attempts > 20 {
            return Err(format!(
                "export.poll_max_attempts must be between 1 and 20, got {}",
                self.poll_max_attempts
            ));
        }

        // The service admits at most 5 concurrent export jobs per account
        if self.start_workers == 0 || self.start_workers > 5 {
            return Err(format!(
                "export.start_workers must be between 1 and 5, got {}",
                self.start_workers
            ));
        }

        if let Some(workers) = self.monitor_workers {
            if workers == 0 || workers > 100 {
                return Err(format!(
                    "export.monitor_workers must be between 1 and 100, got {workers}"
                ));
            }
        }

        if self.download_timeout_secs == 0 {
            return Err("export.download_timeout_secs must be > 0".to_string());
        }

        Ok(())
    }

    pub fn start_base_delay(&self) -> Duration {
        Duration::from_secs(self.start_base_delay_secs)
    }

    pub fn poll_base_delay(&self) -> Duration {
        Duration::from_secs(self.poll_base_delay_secs)
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            start_max_attempts: default_start_max_attempts(),
            start_base_delay_secs: default_start_base_delay_secs(),
            start_workers: default_start_workers(),
            poll_max_attempts: default_poll_max_attempts(),
            poll_base_delay_secs: default_poll_base_delay_secs(),
            monitor_workers: None,
            download_timeout_secs: default_download_timeout_secs(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable JSON file logging next to console output
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_backup_dir() -> String {
    "backup".to_string()
}

fn default_start_max_attempts() -> u32 {
    10
}

fn default_start_base_delay_secs() -> u64 {
    5
}

fn default_start_workers() -> usize {
    3
}

fn default_poll_max_attempts() -> u32 {
    7
}

fn default_poll_base_delay_secs() -> u64 {
    4
}

fn default_download_timeout_secs() -> u64 {
    300
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_config_validation() {
        let mut config = ApplicationConfig::default();
        assert!(config.validate().is_ok());

        config.log_level = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_aws_config_validation() {
        let mut config = AwsConfig::default();
        assert!(config.validate().is_ok());

        config.account_id = Some("123456789012".to_string());
        assert!(config.validate().is_ok());

        config.account_id = Some("not-an-account".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.contains("aws.account_id"));

        config.account_id = None;
        config.region = " ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_storage_config_validation() {
        let mut config = StorageConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.bucket().is_none());

        config.s3_bucket = Some("my-backups".to_string());
        assert!(config.validate().is_ok());
        assert_eq!(config.bucket(), Some("my-backups"));

        config.s3_bucket = Some("my-backups/dashboards".to_string());
        assert!(config.validate().is_err());

        config.s3_bucket = Some("  ".to_string());
        assert!(config.validate().is_err());
        assert!(config.bucket().is_none());

        config.s3_bucket = None;
        config.backup_dir = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_export_config_validation() {
        let mut config = ExportConfig::default();
        assert!(config.validate().is_ok());

        config.start_workers = 6;
        assert!(config.validate().is_err());

        config.start_workers = 3;
        config.monitor_workers = Some(0);
        assert!(config.validate().is_err());

        config.monitor_workers = Some(64);
        assert!(config.validate().is_ok());

        config.poll_max_attempts = 0;
        assert!(config.validate().is_err());

        config.poll_max_attempts = 7;
        config.download_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert!(!config.local_enabled);
        assert_eq!(config.local_path, "logs");
        assert_eq!(config.local_rotation, "daily");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_values() {
        let export = ExportConfig::default();
        assert_eq!(export.start_max_attempts, 10);
        assert_eq!(export.start_base_delay(), Duration::from_secs(5));
        assert_eq!(export.start_workers, 3);
        assert_eq!(export.poll_max_attempts, 7);
        assert_eq!(export.poll_base_delay(), Duration::from_secs(4));
        assert_eq!(export.download_timeout(), Duration::from_secs(300));
        assert!(export.monitor_workers.is_none());

        assert_eq!(default_region(), "us-east-1");
        assert_eq!(default_backup_dir(), "backup");
    }

    #[test]
    fn test_empty_toml_is_valid() {
        let config: VaultConfig = toml::from_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.aws.region, "us-east-1");
    }
}
