//! Amazon QuickSight implementation of [`ExportService`]

use super::traits::{ExportService, JobLifecycle, JobStartResult, JobStatusSnapshot};
use crate::adapters::storage::HttpArtifactFetcher;
use crate::domain::ids::{AccountId, JobId, ResourceArn};
use crate::domain::{ExportJobError, ExportableItem, StorageError};
use async_trait::async_trait;
use aws_sdk_quicksight::error::DisplayErrorContext;
use aws_sdk_quicksight::operation::start_asset_bundle_export_job::StartAssetBundleExportJobError;
use aws_sdk_quicksight::types::AssetBundleExportFormat;

/// QuickSight asset-bundle export client
///
/// Every export includes all dependencies and permissions so a bundle can be
/// restored into an empty account.
#[derive(Debug, Clone)]
pub struct QuickSightClient {
    client: aws_sdk_quicksight::Client,
    fetcher: HttpArtifactFetcher,
}

impl QuickSightClient {
    pub fn new(client: aws_sdk_quicksight::Client, fetcher: HttpArtifactFetcher) -> Self {
        Self { client, fetcher }
    }

    async fn list_all(&self, account: &AccountId) -> Result<Vec<ExportableItem>, String> {
        let mut items = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_dashboards()
                .aws_account_id(account.as_str())
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| DisplayErrorContext(&e).to_string())?;

            items.extend(page.dashboard_summary_list().iter().map(|summary| {
                ExportableItem::new(
                    summary.dashboard_id().unwrap_or_default(),
                    summary.name().unwrap_or_default(),
                    summary.arn(),
                )
            }));

            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        Ok(items)
    }
}

fn classify_start_error(err: &StartAssetBundleExportJobError) -> ExportJobError {
    let message = DisplayErrorContext(err).to_string();
    if err.is_limit_exceeded_exception() {
        ExportJobError::LimitExceeded(message)
    } else if err.is_access_denied_exception() {
        ExportJobError::AccessDenied(message)
    } else if err.is_resource_not_found_exception() {
        ExportJobError::ResourceNotFound(message)
    } else if err.is_invalid_parameter_value_exception() {
        ExportJobError::InvalidRequest(message)
    } else if err.is_throttling_exception() {
        ExportJobError::Throttled(message)
    } else {
        ExportJobError::Service(message)
    }
}

#[async_trait]
impl ExportService for QuickSightClient {
    async fn list_exportable_items(&self, account: &AccountId) -> Vec<ExportableItem> {
        match self.list_all(account).await {
            Ok(items) => {
                tracing::info!(count = items.len(), "Found dashboards to backup");
                items
            }
            Err(e) => {
                tracing::error!(error = %e, "Error listing dashboards");
                Vec::new()
            }
        }
    }

    async fn start_export_job(
        &self,
        account: &AccountId,
        job_id: &JobId,
        resource_arn: &ResourceArn,
    ) -> Result<JobStartResult, ExportJobError> {
        let output = self
            .client
            .start_asset_bundle_export_job()
            .aws_account_id(account.as_str())
            .asset_bundle_export_job_id(job_id.as_str())
            .resource_arns(resource_arn.as_str())
            .include_all_dependencies(true)
            .include_permissions(true)
            .export_format(AssetBundleExportFormat::QuicksightJson)
            .send()
            .await
            .map_err(|e| match e.as_service_error() {
                Some(service_err) => classify_start_error(service_err),
                None => ExportJobError::Transport(DisplayErrorContext(&e).to_string()),
            })?;

        Ok(JobStartResult {
            http_status: u16::try_from(output.status()).unwrap_or(200),
            job_id: job_id.clone(),
            job_arn: output.arn().map(str::to_string),
        })
    }

    async fn describe_export_job(&self, account: &AccountId, job_id: &JobId) -> JobStatusSnapshot {
        let result = self
            .client
            .describe_asset_bundle_export_job()
            .aws_account_id(account.as_str())
            .asset_bundle_export_job_id(job_id.as_str())
            .send()
            .await;

        match result {
            Ok(output) => JobStatusSnapshot {
                http_status: u16::try_from(output.status()).unwrap_or(500),
                lifecycle: output
                    .job_status()
                    .map(|s| JobLifecycle::parse(s.as_str()))
                    .unwrap_or_else(|| JobLifecycle::Other(String::new())),
                download_url: output.download_url().map(str::to_string),
                errors: output
                    .errors()
                    .iter()
                    .filter_map(|e| e.message().map(str::to_string))
                    .collect(),
            },
            Err(e) => {
                tracing::error!(
                    job_id = %job_id,
                    error = %DisplayErrorContext(&e),
                    "Error describing export job"
                );
                JobStatusSnapshot::transport_error()
            }
        }
    }

    async fn fetch_artifact(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        self.fetcher.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_quicksight::types::error::LimitExceededException;

    #[test]
    fn test_limit_exceeded_is_classified_from_modeled_error() {
        let err = StartAssetBundleExportJobError::LimitExceededException(
            LimitExceededException::builder()
                .message("ResourceType: ASSET_BUNDLE_EXPORT_JOB")
                .build(),
        );
        assert!(classify_start_error(&err).is_admission_limit());
    }

    #[test]
    fn test_export_format_wire_value() {
        assert_eq!(
            AssetBundleExportFormat::QuicksightJson.as_str(),
            "QUICKSIGHT_JSON"
        );
    }
}
