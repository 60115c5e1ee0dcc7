//! Error types for cardsync
//!
//! Startup failures only: loading and validating configuration. Runtime
//! problems while syncing (policy skips, failed outbound actions) are logged
//! and never surface as a `CardSyncError`.

use crate::config::ValidationError;
use thiserror::Error;

/// Result type alias for cardsync operations
pub type Result<T> = std::result::Result<T, CardSyncError>;

/// Error type for cardsync operations
#[derive(Error, Debug)]
pub enum CardSyncError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration loaded but failed validation
    #[error("Configuration validation failed:\n  - {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("\n  - ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_lists_every_problem() {
        let err = CardSyncError::Validation(vec![
            ValidationError::new("projects", "At least one project must be defined"),
            ValidationError::new("default_project", "Unknown project 'shop'"),
        ]);

        let rendered = err.to_string();
        assert!(rendered.starts_with("Configuration validation failed:"));
        assert!(rendered.contains("projects: At least one project must be defined"));
        assert!(rendered.contains("default_project: Unknown project 'shop'"));
    }
}
