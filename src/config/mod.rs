//! Configuration management for qsvault.
//!
//! TOML configuration with `${VAR_NAME}` substitution, `QSVAULT_<SECTION>_<KEY>`
//! environment overrides, defaults for every setting, and validation on load.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qsvault::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("qsvault.toml")?;
//!
//! println!("Region: {}", config.aws.region);
//! if let Some(bucket) = config.storage.bucket() {
//!     println!("Uploading to s3://{bucket}/{}", config.storage.s3_key_prefix);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level
//! - [`AwsConfig`] - Account, profile and region
//! - [`StorageConfig`] - S3 bucket, key prefix, local backup directory
//! - [`ExportConfig`] - Retry budgets and worker pool sizes
//! - [`LoggingConfig`] - JSON file logging
//!
//! # Example Configuration
//!
//! ```toml
//! [aws]
//! region = "us-east-1"
//! profile_name = "backup"
//!
//! [storage]
//! s3_bucket = "${QS_BACKUP_BUCKET}"
//! s3_key_prefix = "quicksight"
//! backup_dir = "backup"
//!
//! [export]
//! start_workers = 3
//! ```

pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_or_env};
pub use schema::{
    ApplicationConfig, AwsConfig, ExportConfig, LoggingConfig, StorageConfig, VaultConfig,
};
