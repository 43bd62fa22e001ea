//! AWS session setup
//!
//! Builds the shared SDK configuration once per run and hands out the
//! service clients the pipeline needs.

use super::quicksight::QuickSightClient;
use super::storage::{HttpArtifactFetcher, S3ObjectStore};
use crate::config::AwsConfig;
use crate::domain::{AccountId, Result, VaultError};
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_sts::error::DisplayErrorContext;
use std::time::Duration;

/// Resolved AWS session for one run
#[derive(Debug, Clone)]
pub struct AwsContext {
    account_id: AccountId,
    sdk_config: SdkConfig,
}

impl AwsContext {
    /// Loads credentials for the configured profile and region and resolves
    /// the account to back up
    ///
    /// The account comes from `config.account_id` when set, otherwise from the
    /// caller identity.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Identity`] if the account cannot be resolved
    pub async fn connect(config: &AwsConfig) -> Result<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(profile) = &config.profile_name {
            loader = loader.profile_name(profile);
        }
        let sdk_config = loader.load().await;

        let account_id = match &config.account_id {
            Some(id) => AccountId::new(id.as_str()).map_err(VaultError::Identity)?,
            None => resolve_caller_account(&sdk_config).await?,
        };

        tracing::info!(
            account_id = %account_id,
            region = %config.region,
            profile = config.profile_name.as_deref().unwrap_or("default"),
            "AWS session ready"
        );

        Ok(Self {
            account_id,
            sdk_config,
        })
    }

    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// QuickSight export client with the given artifact download timeout
    pub fn export_service(&self, download_timeout: Duration) -> Result<QuickSightClient> {
        let fetcher = HttpArtifactFetcher::new(download_timeout)?;
        Ok(QuickSightClient::new(
            aws_sdk_quicksight::Client::new(&self.sdk_config),
            fetcher,
        ))
    }

    pub fn object_store(&self) -> S3ObjectStore {
        S3ObjectStore::new(aws_sdk_s3::Client::new(&self.sdk_config))
    }
}

async fn resolve_caller_account(sdk_config: &SdkConfig) -> Result<AccountId> {
    let sts = aws_sdk_sts::Client::new(sdk_config);
    let identity = sts.get_caller_identity().send().await.map_err(|e| {
        VaultError::Identity(format!(
            "Failed to resolve caller identity: {}",
            DisplayErrorContext(&e)
        ))
    })?;

    let account = identity
        .account()
        .ok_or_else(|| VaultError::Identity("Caller identity has no account".to_string()))?;

    AccountId::new(account).map_err(VaultError::Identity)
}
