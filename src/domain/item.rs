//! Exportable items and the handles that track them through the pipeline

use super::ids::{JobId, ResourceArn};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used when the service returns a dashboard without one
pub const UNKNOWN_ITEM_NAME: &str = "Unknown";

/// A dashboard enumerated at the start of a run
///
/// Immutable once enumerated. The ARN is optional because the service may
/// return summaries without one; such items end as `MISSING_ARN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportableItem {
    /// Dashboard ID
    pub id: String,

    /// Display name
    pub name: String,

    /// Dashboard ARN
    pub resource_arn: Option<ResourceArn>,
}

impl ExportableItem {
    /// Creates an item, normalizing a blank name and a blank ARN
    ///
    /// # Examples
    ///
    /// ```
    /// use qsvault::domain::ExportableItem;
    ///
    /// let item = ExportableItem::new("d1", "", Some(""));
    /// assert_eq!(item.name, "Unknown");
    /// assert!(item.resource_arn.is_none());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, arn: Option<&str>) -> Self {
        let name = name.into();
        Self {
            id: id.into(),
            name: if name.is_empty() {
                UNKNOWN_ITEM_NAME.to_string()
            } else {
                name
            },
            resource_arn: arn.and_then(|a| ResourceArn::new(a).ok()),
        }
    }
}

/// Run-scoped position of an item, for progress reporting only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    /// 1-based index
    pub index: usize,

    /// Items in the run
    pub total: usize,
}

impl Position {
    pub fn new(index: usize, total: usize) -> Self {
        Self { index, total }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}/{}]", self.index, self.total)
    }
}

/// An item ready to be submitted as an export job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub item: ExportableItem,
    pub resource_arn: ResourceArn,
    pub job_id: JobId,
    pub position: Position,
}

impl SubmissionRequest {
    /// Builds a request, or returns `None` when the item has no ARN
    pub fn prepare(item: ExportableItem, position: Position) -> Option<Self> {
        let resource_arn = item.resource_arn.clone()?;
        let job_id = JobId::from_resource_arn(&resource_arn, position.index);
        Some(Self {
            item,
            resource_arn,
            job_id,
            position,
        })
    }
}

/// A successfully started export job awaiting monitoring
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobHandle {
    pub job_id: JobId,
    pub name: String,
    pub position: Position,
}

impl From<&SubmissionRequest> for JobHandle {
    fn from(request: &SubmissionRequest) -> Self {
        Self {
            job_id: request.job_id.clone(),
            name: request.item.name.clone(),
            position: request.position,
        }
    }
}
