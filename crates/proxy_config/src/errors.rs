//! Configuration system error types.
//!
//! Domain-specific errors for structural merging and provider access.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Configuration system errors.
///
/// A merge can only fail with [`ConfigurationError::SchemaMismatch`], which
/// is not retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("Schema mismatch at '{path}': {reason}")]
    SchemaMismatch { path: String, reason: String },

    #[error("Unsupported proxy provider type: {provider_type}")]
    UnsupportedProvider { provider_type: String },

    #[error("Failed to parse configuration: {reason}")]
    ParseError { reason: String },
}

impl ConfigurationError {
    /// Creates a schema mismatch for the value currently being merged.
    ///
    /// The path starts out empty and is filled in by [`Self::within`] as the
    /// error travels back up through the enclosing fields.
    pub fn schema_mismatch(reason: impl Into<String>) -> Self {
        Self::SchemaMismatch {
            path: String::new(),
            reason: reason.into(),
        }
    }

    /// Prefixes the path of a schema mismatch with the enclosing field name.
    ///
    /// An empty field name marks a flattened field and leaves the path as is.
    /// Other variants are returned unchanged.
    pub fn within(self, field: &str) -> Self {
        if field.is_empty() {
            return self;
        }
        match self {
            Self::SchemaMismatch { path, reason } => {
                let path = if path.is_empty() {
                    field.to_string()
                } else if path.starts_with('[') {
                    format!("{field}{path}")
                } else {
                    format!("{field}.{path}")
                };
                Self::SchemaMismatch { path, reason }
            }
            other => other,
        }
    }
}

/// Result type alias for configuration operations.
pub type ConfigurationResult<T> = Result<T, ConfigurationError>;

/// Result type alias for merge operations.
pub type MergeResult<T> = ConfigurationResult<T>;
