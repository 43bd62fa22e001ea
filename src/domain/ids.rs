//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers that flow through a backup run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// AWS account identifier
///
/// Always twelve ASCII digits.
///
/// # Examples
///
/// ```
/// use qsvault::domain::ids::AccountId;
/// use std::str::FromStr;
///
/// let account = AccountId::from_str("123456789012").unwrap();
/// assert_eq!(account.as_str(), "123456789012");
/// assert!(AccountId::from_str("12345").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new AccountId, validating its format
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err("Account ID cannot be empty".to_string());
        }
        if id.len() != 12 || !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!(
                "Invalid account ID '{id}'. Expected 12 digits"
            ));
        }
        Ok(Self(id))
    }

    /// Returns the account ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for AccountId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resource ARN of an exportable dashboard
///
/// # Examples
///
/// ```
/// use qsvault::domain::ids::ResourceArn;
///
/// let arn = ResourceArn::new("arn:aws:quicksight:us-east-1:123456789012:dashboard/sales").unwrap();
/// assert_eq!(arn.trailing_segment(), "sales");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceArn(String);

impl ResourceArn {
    /// Creates a new ResourceArn; blank input is rejected
    pub fn new(arn: impl Into<String>) -> Result<Self, String> {
        let arn = arn.into();
        if arn.trim().is_empty() {
            return Err("Resource ARN cannot be empty".to_string());
        }
        Ok(Self(arn))
    }

    /// Returns the ARN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The last `/`-separated segment of the ARN (the whole ARN if it has none)
    pub fn trailing_segment(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ResourceArn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceArn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Export job identifier
///
/// The job ID is the remote job's key and the correlation key through both
/// pipeline stages, so it is derived deterministically from the dashboard ARN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobId(String);

impl JobId {
    /// Derives the job ID from the ARN's trailing path segment
    ///
    /// Falls back to `job_<index>` when the trailing segment is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use qsvault::domain::ids::{JobId, ResourceArn};
    ///
    /// let arn = ResourceArn::new("arn:aws:quicksight:eu-west-1:123456789012:dashboard/abc-123").unwrap();
    /// assert_eq!(JobId::from_resource_arn(&arn, 1).as_str(), "abc-123");
    ///
    /// let odd = ResourceArn::new("arn:aws:quicksight:eu-west-1:123456789012:dashboard/").unwrap();
    /// assert_eq!(JobId::from_resource_arn(&odd, 4).as_str(), "job_4");
    /// ```
    pub fn from_resource_arn(arn: &ResourceArn, index: usize) -> Self {
        let segment = arn.trailing_segment().trim();
        if segment.is_empty() {
            Self(format!("job_{index}"))
        } else {
            Self(segment.to_string())
        }
    }

    /// Returns the job ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for JobId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
