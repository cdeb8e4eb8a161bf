//! Error types for Episteme
//!
//! Provides a unified error type and domain-specific error variants

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using EpistemeError
pub type Result<T> = std::result::Result<T, EpistemeError>;

/// Unified error type for Episteme operations
#[derive(Debug, Error)]
pub enum EpistemeError {
    // Threshold profile errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    // Snapshot store errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    // Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures of a text-to-vector scoring strategy
///
/// Never surfaces through [`EpistemeError`]: the assessor fails closed.
#[derive(Debug, Clone, Error)]
pub enum ScoringError {
    #[error("Empty request summary")]
    EmptyInput,

    #[error("Strategy produced a non-finite score for {dimension}")]
    NonFinite { dimension: String },

    #[error("Scoring backend unavailable: {0}")]
    Unavailable(String),
}

/// Threshold profile lookup and loading errors
#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("Profile not found: {0}")]
    NotFound(String),

    #[error("Invalid profile {name}: {reason}")]
    Invalid { name: String, reason: String },

    #[error("Failed to load profiles: {0}")]
    Load(String),
}

/// Snapshot store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Snapshot directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Snapshot not found: {0}")]
    NotFound(String),

    #[error("Snapshot already exists: {0}")]
    AlreadyExists(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<config::ConfigError> for ProfileError {
    fn from(err: config::ConfigError) -> Self {
        ProfileError::Load(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err.to_string())
    }
}

// Implement From for common external error types
impl From<std::io::Error> for EpistemeError {
    fn from(err: std::io::Error) -> Self {
        EpistemeError::Internal(err.to_string())
    }
}

impl From<anyhow::Error> for EpistemeError {
    fn from(err: anyhow::Error) -> Self {
        EpistemeError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EpistemeError::Profile(ProfileError::NotFound("stoic".to_string()));
        assert!(err.to_string().contains("stoic"));
    }

    #[test]
    fn test_missing_directory_names_path() {
        let err = StoreError::DirectoryNotFound(PathBuf::from("/tmp/nowhere"));
        assert!(err.to_string().contains("/tmp/nowhere"));
    }
}
