//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::VaultConfig;
use crate::domain::errors::VaultError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into VaultConfig
/// 4. Applies environment variable overrides (QSVAULT_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File does not exist or cannot be read
/// - A referenced environment variable is not set
/// - TOML parsing fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use qsvault::config::loader::load_config;
///
/// let config = load_config("qsvault.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<VaultConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VaultError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        VaultError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let mut config: VaultConfig = toml::from_str(&contents)
        .map_err(|e| VaultError::Configuration(format!("Failed to parse TOML: {e}")))?;

    finish(&mut config)?;
    Ok(config)
}

/// Loads configuration from `path` when it exists, otherwise from defaults
///
/// Environment overrides and validation apply either way, so a backup can run
/// from the environment alone.
pub fn load_config_or_env(path: impl AsRef<Path>) -> Result<VaultConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load_config(path);
    }

    tracing::debug!(
        path = %path.display(),
        "Configuration file not found, using defaults and environment"
    );
    let mut config = VaultConfig::default();
    finish(&mut config)?;
    Ok(config)
}

fn finish(config: &mut VaultConfig) -> Result<()> {
    apply_legacy_env(config);
    apply_env_overrides(config);

    config.validate().map_err(|e| {
        VaultError::Configuration(format!("Configuration validation failed: {e}"))
    })
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error naming every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let mut result = String::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in ENV_PLACEHOLDER.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{var_name}}}");
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(VaultError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Applies the unprefixed variables used by the standalone backup script
///
/// Runs before [`apply_env_overrides`], so a QSVAULT_* variable wins over its
/// unprefixed alias.
fn apply_legacy_env(config: &mut VaultConfig) {
    if let Some(val) = env_opt("LOG_LEVEL") {
        config.application.log_level = val.to_lowercase();
    }
    if let Some(val) = env_opt("ACCOUNT_ID") {
        config.aws.account_id = Some(val);
    }
    if let Some(val) = env_opt("PROFILE_NAME") {
        config.aws.profile_name = Some(val);
    }
    if let Some(val) = env_opt("REGION_NAME") {
        config.aws.region = val;
    }
    if let Some(val) = env_opt("S3_BUCKET_NAME") {
        config.storage.s3_bucket = Some(val);
    }
    if let Ok(val) = std::env::var("S3_KEY_PREFIX") {
        config.storage.s3_key_prefix = val;
    }
    if let Some(val) = env_opt("BACKUP_DIR") {
        config.storage.backup_dir = val;
    }
}

/// Applies environment variable overrides using the QSVAULT_* prefix
///
/// Variables follow the pattern QSVAULT_<SECTION>_<KEY>, for example
/// QSVAULT_STORAGE_S3_BUCKET or QSVAULT_EXPORT_MONITOR_WORKERS.
/// Unparseable numeric values are ignored.
fn apply_env_overrides(config: &mut VaultConfig) {
    // Application
    if let Some(val) = env_opt("QSVAULT_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // AWS
    if let Some(val) = env_opt("QSVAULT_AWS_ACCOUNT_ID") {
        config.aws.account_id = Some(val);
    }
    if let Some(val) = env_opt("QSVAULT_AWS_PROFILE_NAME") {
        config.aws.profile_name = Some(val);
    }
    if let Some(val) = env_opt("QSVAULT_AWS_REGION") {
        config.aws.region = val;
    }

    // Storage
    if let Some(val) = env_opt("QSVAULT_STORAGE_S3_BUCKET") {
        config.storage.s3_bucket = Some(val);
    }
    if let Ok(val) = std::env::var("QSVAULT_STORAGE_S3_KEY_PREFIX") {
        config.storage.s3_key_prefix = val;
    }
    if let Some(val) = env_opt("QSVAULT_STORAGE_BACKUP_DIR") {
        config.storage.backup_dir = val;
    }

    // Export
    if let Some(n) = env_opt("QSVAULT_EXPORT_START_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
        config.export.start_max_attempts = n;
    }
    if let Some(n) = env_opt("QSVAULT_EXPORT_START_BASE_DELAY_SECS").and_then(|v| v.parse().ok())
    {
        config.export.start_base_delay_secs = n;
    }
    if let Some(n) = env_opt("QSVAULT_EXPORT_START_WORKERS").and_then(|v| v.parse().ok()) {
        config.export.start_workers = n;
    }
    if let Some(n) = env_opt("QSVAULT_EXPORT_POLL_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
        config.export.poll_max_attempts = n;
    }
    if let Some(n) = env_opt("QSVAULT_EXPORT_POLL_BASE_DELAY_SECS").and_then(|v| v.parse().ok()) {
        config.export.poll_base_delay_secs = n;
    }
    if let Some(n) = env_opt("QSVAULT_EXPORT_MONITOR_WORKERS").and_then(|v| v.parse().ok()) {
        config.export.monitor_workers = Some(n);
    }
    if let Some(n) = env_opt("QSVAULT_EXPORT_DOWNLOAD_TIMEOUT_SECS").and_then(|v| v.parse().ok())
    {
        config.export.download_timeout_secs = n;
    }

    // Logging
    if let Some(val) = env_opt("QSVAULT_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(true);
    }
    if let Some(val) = env_opt("QSVAULT_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Some(val) = env_opt("QSVAULT_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }
}
