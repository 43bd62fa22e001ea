//! End-of-run reporting

use crate::domain::JobOutcome;
use serde_json::{json, Value};
use std::fmt::{self, Write as _};
use std::time::Duration;

const RULE: &str = "============================================================";

/// Result of one backup run
#[derive(Debug, Clone)]
pub struct BackupReport {
    /// Account the dashboards belong to
    pub account_id: String,

    /// Dashboards enumerated at run start
    pub total: usize,

    /// Outcomes with `SUCCESS`
    pub successful: usize,

    /// Every other outcome
    pub failed: usize,

    /// Successful artifacts written locally after an upload failure
    pub fallback_saves: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,

    /// Where artifacts were sent
    pub destination: String,

    /// One outcome per dashboard
    pub outcomes: Vec<JobOutcome>,
}

impl BackupReport {
    /// Builds the report from the ledger contents
    pub fn from_outcomes(
        account_id: impl Into<String>,
        outcomes: Vec<JobOutcome>,
        duration: Duration,
        destination: impl Into<String>,
    ) -> Self {
        let successful = outcomes.iter().filter(|o| o.status.is_success()).count();
        let fallback_saves = outcomes
            .iter()
            .filter(|o| {
                o.status.is_success()
                    && o.artifact.as_ref().is_some_and(|a| a.location.is_fallback())
            })
            .count();

        Self {
            account_id: account_id.into(),
            total: outcomes.len(),
            successful,
            failed: outcomes.len() - successful,
            fallback_saves,
            duration,
            destination: destination.into(),
            outcomes,
        }
    }

    pub fn successes(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| o.status.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|o| !o.status.is_success())
    }

    /// Check if every dashboard was backed up
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 100.0;
        }
        (self.successful as f64 / self.total as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            account_id = %self.account_id,
            total = self.total,
            successful = self.successful,
            failed = self.failed,
            fallback_saves = self.fallback_saves,
            duration_secs = self.duration.as_secs_f64(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Backup completed"
        );

        for outcome in self.failures() {
            tracing::warn!(
                dashboard = %outcome.name,
                status = %outcome.status,
                message = outcome.message.as_deref().unwrap_or(""),
                "Backup failed"
            );
        }
    }

    /// Human-readable report
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// Response body in the shape of a function handler result
    pub fn to_response(&self) -> Value {
        json!({
            "statusCode": 200,
            "body": {
                "account_id": self.account_id,
                "total": self.total,
                "successful": self.successful,
                "failed": self.failed,
                "fallback_saves": self.fallback_saves,
                "duration": self.duration.as_secs_f64(),
                "destination": self.destination,
                "outcomes": self.outcomes,
            }
        })
    }

    /// Response body for a run that failed before producing a report
    pub fn error_response(error: &dyn fmt::Display) -> Value {
        json!({
            "statusCode": 500,
            "body": { "error": error.to_string() }
        })
    }
}

impl fmt::Display for BackupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        writeln!(out, "{RULE}")?;
        writeln!(out, "BACKUP REPORT")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Total dashboards: {}", self.total)?;
        writeln!(out, "Successful backups: {}", self.successful)?;
        writeln!(out, "Failed backups: {}", self.failed)?;
        writeln!(out, "Duration: {:.1}s", self.duration.as_secs_f64())?;

        if self.successful > 0 {
            writeln!(out, "\nSuccessful backups:")?;
            for outcome in self.successes() {
                writeln!(out, "  ✓ {} ({})", outcome.name, outcome.display_timestamp())?;
            }
        }

        if self.failed > 0 {
            writeln!(out, "\nFailed backups:")?;
            for outcome in self.failures() {
                match &outcome.message {
                    Some(message) => writeln!(
                        out,
                        "  ✗ {} - {}: {} ({})",
                        outcome.name,
                        outcome.status,
                        message,
                        outcome.display_timestamp()
                    )?,
                    None => writeln!(
                        out,
                        "  ✗ {} - {} ({})",
                        outcome.name,
                        outcome.status,
                        outcome.display_timestamp()
                    )?,
                }
            }
        }

        writeln!(out, "\nBackup files saved to: {}", self.destination)?;
        if self.fallback_saves > 0 {
            writeln!(
                out,
                "{} artifact(s) saved locally after upload failure",
                self.fallback_saves
            )?;
        }
        write!(out, "{RULE}")?;

        f.write_str(&out)
    }
}
