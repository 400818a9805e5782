use thiserror::Error;

/// Errors raised while validating cache configuration.
///
/// Cache operations themselves never fail; failures of a cache-aside
/// producer are returned to the caller with their own error type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    #[error("Invalid cache option `{option}`: {reason}")]
    InvalidOption { option: String, reason: String },
}

impl CacheError {
    /// Create a new InvalidOption error
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for cache configuration
pub type Result<T> = std::result::Result<T, CacheError>;
