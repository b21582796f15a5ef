//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid socket address: {0}")]
    InvalidSocketAddr(String),

    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Invalid AI temperature (expected 0.0..=2.0)")]
    InvalidTemperature,

    #[error("Upload size limit must be greater than zero")]
    InvalidUploadLimit,

    #[error("Request timeout ({request_secs}s) must exceed the AI and backend timeouts combined ({turn_secs}s)")]
    RequestTimeoutTooShort { request_secs: u64, turn_secs: u64 },

    #[error("Poller {0} must be greater than zero")]
    InvalidPoller(&'static str),
}
