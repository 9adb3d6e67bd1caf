//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to load configuration from environment
    #[error("Failed to load configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required configuration value is missing
    #[error("Missing required configuration: {0}")]
    MissingRequired(&'static str),

    /// Server port is invalid
    #[error("Invalid server port: must be between 1 and 65535")]
    InvalidPort,

    /// Request timeout is out of range
    #[error("Invalid request timeout: must be between 1 and 300 seconds")]
    InvalidTimeout,

    /// Database URL is malformed
    #[error("Invalid database URL: must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    /// Database pool configuration is invalid
    #[error("Invalid pool size: min_connections must not exceed max_connections")]
    InvalidPoolSize,

    /// Database pool is too large
    #[error("Pool size too large: max_connections must not exceed 100")]
    PoolSizeTooLarge,

    /// Supabase project URL must use HTTPS in production
    #[error("Supabase project URL must use HTTPS in production")]
    ProjectUrlMustBeHttps,

    /// Model timeout is out of range
    #[error("Invalid model timeout: must be between 1 and 600 seconds")]
    InvalidModelTimeout,
}
