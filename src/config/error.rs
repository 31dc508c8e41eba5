//! Configuration error types.

use thiserror::Error;

/// Failure to load or deserialize configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Semantic validation failures after loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("required configuration value missing: {0}")]
    MissingRequired(&'static str),

    #[error("server port must be non-zero")]
    InvalidPort,

    #[error("request timeout must be between 1 and 300 seconds")]
    InvalidTimeout,

    #[error("database url must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("database pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("database pool size exceeds 100 connections")]
    PoolSizeTooLarge,

    #[error("jwt secret must be at least 32 bytes")]
    WeakJwtSecret,

    #[error("engine base url must start with http:// or https://")]
    InvalidEngineUrl,

    #[error("chat bot token is required when the chat channel is enabled")]
    MissingBotToken,
}
