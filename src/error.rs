//! Error types for the canchita service
//!
//! This module defines all error types using anyhow for consistent error
//! handling throughout the application.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific league scenarios
#[derive(Debug, thiserror::Error)]
pub enum LeagueError {
    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },

    #[error("Invalid match: {reason}")]
    InvalidMatch { reason: String },

    #[error("Invalid balancing request: {reason}")]
    InvalidInput { reason: String },

    #[error("Storage operation failed: {message}")]
    StorageError { message: String },

    #[error("Team balancing exceeded its time budget after {elapsed_ms}ms")]
    BalancerTimeout { elapsed_ms: u64 },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal service error: {message}")]
    InternalError { message: String },
}
