//! Error types for Railtrail
//!
//! This module defines all error types used throughout the crate,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Railtrail operations
///
/// Session operations that can be safely skipped (no current session,
/// stale session id) are reported through [`crate::session::Outcome`]
/// instead; the variants here cover genuine failures.
#[derive(Error, Debug)]
pub enum RailtrailError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value store backend errors (open, read, write, flush)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Session bookkeeping errors
    #[error("Session error: {0}")]
    Session(String),

    /// Reservation draft rejected on submit
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for Railtrail operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let error = RailtrailError::Config("invalid format".to_string());
        assert_eq!(error.to_string(), "Configuration error: invalid format");
    }

    #[test]
    fn test_storage_error_display() {
        let error = RailtrailError::Storage("flush failed".to_string());
        assert_eq!(error.to_string(), "Storage error: flush failed");
    }

    #[test]
    fn test_session_error_display() {
        let error = RailtrailError::Session("unknown track".to_string());
        assert_eq!(error.to_string(), "Session error: unknown track");
    }

    #[test]
    fn test_validation_error_display() {
        let error = RailtrailError::Validation("arrival station is required".to_string());
        assert_eq!(
            error.to_string(),
            "Validation error: arrival station is required"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let error: RailtrailError = io_error.into();
        assert!(matches!(error, RailtrailError::Io(_)));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let error: RailtrailError = json_error.into();
        assert!(matches!(error, RailtrailError::Serialization(_)));
    }

    #[test]
    fn test_yaml_error_conversion() {
        let yaml_error = serde_yaml::from_str::<serde_yaml::Value>("invalid: : yaml").unwrap_err();
        let error: RailtrailError = yaml_error.into();
        assert!(matches!(error, RailtrailError::Yaml(_)));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RailtrailError>();
    }
}
