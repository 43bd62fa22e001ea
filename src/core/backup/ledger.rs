//! Run-scoped collection of job outcomes

use crate::domain::{BackupStatus, JobOutcome};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Outcomes recorded during one backup run
///
/// Shared behind an `Arc` by the orchestrator and the monitoring workers.
/// Entries carry no ordering guarantee.
#[derive(Debug, Default)]
pub struct BackupLedger {
    outcomes: Mutex<Vec<JobOutcome>>,
}

impl BackupLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, outcome: JobOutcome) {
        self.lock().push(outcome);
    }

    pub fn extend(&self, outcomes: impl IntoIterator<Item = JobOutcome>) {
        self.lock().extend(outcomes);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the recorded outcomes
    pub fn snapshot(&self) -> Vec<JobOutcome> {
        self.lock().clone()
    }

    /// Number of outcomes per status
    pub fn counts(&self) -> HashMap<BackupStatus, usize> {
        let mut counts = HashMap::new();
        for outcome in self.lock().iter() {
            *counts.entry(outcome.status).or_insert(0) += 1;
        }
        counts
    }

    // A panicking writer cannot leave a half-pushed Vec behind
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<JobOutcome>> {
        self.outcomes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
