//! List command implementation
//!
//! Enumerates dashboards without starting any export jobs.

use super::{EXIT_CONFIG_ERROR, EXIT_CONNECTION_ERROR, EXIT_SUCCESS};
use crate::adapters::storage::artifact_filename;
use crate::config::load_config_or_env;
use crate::core::backup::BackupCoordinator;
use crate::domain::ExportableItem;
use clap::Args;

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    /// AWS account ID (resolved from the caller identity when omitted)
    #[arg(long)]
    pub account_id: Option<String>,

    /// Print dashboards as JSON
    #[arg(long)]
    pub json: bool,
}

impl ListArgs {
    /// Execute the list command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = match load_config_or_env(config_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(EXIT_CONFIG_ERROR);
            }
        };

        if let Some(account_id) = &self.account_id {
            config.aws.account_id = Some(account_id.clone());
        }
        if let Err(e) = config.validate() {
            eprintln!("❌ Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG_ERROR);
        }

        let coordinator = match BackupCoordinator::connect(&config).await {
            Ok(c) => c,
            Err(e) => {
                eprintln!("❌ Failed to connect to AWS: {e}");
                return Ok(EXIT_CONNECTION_ERROR);
            }
        };

        let items = coordinator.plan().await;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&items)?);
            return Ok(EXIT_SUCCESS);
        }

        println!(
            "📋 {} dashboard(s) in account {}",
            items.len(),
            coordinator.account_id()
        );
        println!();
        for line in items.iter().map(describe_item) {
            println!("{line}");
        }

        Ok(EXIT_SUCCESS)
    }
}

fn describe_item(item: &ExportableItem) -> String {
    match &item.resource_arn {
        Some(_) => format!("  • {} ({}) -> {}", item.name, item.id, artifact_filename(&item.name)),
        None => format!("  • {} ({}) - missing ARN, will be skipped", item.name, item.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_item() {
        let item = ExportableItem::new(
            "ops",
            "Ops: Daily",
            Some("arn:aws:quicksight:us-east-1:123456789012:dashboard/ops"),
        );
        assert_eq!(describe_item(&item), "  • Ops: Daily (ops) -> Ops_ Daily.qs");

        let item = ExportableItem::new("legacy", "Legacy", None);
        assert!(describe_item(&item).contains("missing ARN"));
    }
}
