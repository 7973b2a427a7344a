//! Error handling for the Gatherly request service
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the request service
#[derive(Error, Debug)]
pub enum GatherlyError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Request not found: {request_id}")]
    RequestNotFound { request_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("Collaborator error: {0}")]
    Gateway(#[from] GatewayError),
}

/// Errors raised by the remote collaborator gateways
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("{service} request failed: {message}")]
    RequestFailed { service: &'static str, message: String },

    #[error("{service} request timed out")]
    Timeout { service: &'static str },

    #[error("{service} is unavailable")]
    ServiceUnavailable { service: &'static str },

    #[error("{service} returned an invalid response: {message}")]
    InvalidResponse { service: &'static str, message: String },

    #[error("{service} has no record for id {id}")]
    NotFound { service: &'static str, id: i64 },
}

impl GatewayError {
    /// Name of the collaborator that produced this error
    pub fn service(&self) -> &'static str {
        match self {
            GatewayError::RequestFailed { service, .. } => service,
            GatewayError::Timeout { service } => service,
            GatewayError::ServiceUnavailable { service } => service,
            GatewayError::InvalidResponse { service, .. } => service,
            GatewayError::NotFound { service, .. } => service,
        }
    }
}

/// Result type alias for request service operations
pub type Result<T> = std::result::Result<T, GatherlyError>;

/// Result type alias for gateway calls
pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

impl GatherlyError {
    /// Check if the error is recoverable by retrying the operation
    pub fn is_recoverable(&self) -> bool {
        match self {
            GatherlyError::Database(_) => false,
            GatherlyError::Migration(_) => false,
            GatherlyError::Redis(_) => true,
            GatherlyError::Http(_) => true,
            GatherlyError::Serialization(_) => false,
            GatherlyError::Io(_) => true,
            GatherlyError::Config(_) => false,
            GatherlyError::RequestNotFound { .. } => false,
            GatherlyError::EventNotFound { .. } => false,
            GatherlyError::UserNotFound { .. } => false,
            GatherlyError::Forbidden(_) => false,
            GatherlyError::Conflict(_) => false,
            GatherlyError::InvalidInput(_) => false,
            GatherlyError::DependencyUnavailable(_) => true,
            GatherlyError::Gateway(e) => !matches!(e, GatewayError::NotFound { .. }),
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            GatherlyError::Database(_) => ErrorSeverity::Critical,
            GatherlyError::Migration(_) => ErrorSeverity::Critical,
            GatherlyError::Config(_) => ErrorSeverity::Critical,
            GatherlyError::Forbidden(_) => ErrorSeverity::Warning,
            GatherlyError::Conflict(_) => ErrorSeverity::Warning,
            GatherlyError::InvalidInput(_) => ErrorSeverity::Info,
            GatherlyError::RequestNotFound { .. } => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}
