//! Result type alias for qsvault

use super::errors::VaultError;

/// Result type alias for qsvault operations
///
/// # Examples
///
/// ```
/// use qsvault::domain::result::Result;
/// use qsvault::domain::errors::VaultError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(VaultError::Configuration("missing region".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, VaultError>;
