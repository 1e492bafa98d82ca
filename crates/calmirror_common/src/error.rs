// --- File: crates/calmirror_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type returned by calmirror HTTP handlers.
///
/// Crate-specific errors are converted into this type at the handler boundary,
/// where it is rendered as a JSON error body with a matching status code.
#[derive(Error, Debug)]
pub enum CalmirrorError {
    /// Error occurred due to missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Error occurred during validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error occurred during database operation
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Error occurred during external service call
    #[error("External service error: {service_name} - {message}")]
    ExternalServiceError {
        service_name: String,
        message: String,
    },

    /// Error occurred due to a resource not being found
    #[error("Not found: {0}")]
    NotFoundError(String),

    /// Error occurred due to an internal error
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for CalmirrorError {
    fn status_code(&self) -> u16 {
        match self {
            CalmirrorError::ConfigError(_) => 500,
            CalmirrorError::ValidationError(_) => 400,
            CalmirrorError::DatabaseError(_) => 500,
            // Provider failures are not the caller's fault but they are not
            // forwarded as gateway errors either.
            CalmirrorError::ExternalServiceError { .. } => 500,
            CalmirrorError::NotFoundError(_) => 404,
            CalmirrorError::InternalError(_) => 500,
        }
    }
}

pub fn config_error<T: fmt::Display>(message: T) -> CalmirrorError {
    CalmirrorError::ConfigError(message.to_string())
}

pub fn validation_error<T: fmt::Display>(message: T) -> CalmirrorError {
    CalmirrorError::ValidationError(message.to_string())
}

pub fn not_found<T: fmt::Display>(message: T) -> CalmirrorError {
    CalmirrorError::NotFoundError(message.to_string())
}

pub fn external_service_error<T: fmt::Display>(service_name: &str, message: T) -> CalmirrorError {
    CalmirrorError::ExternalServiceError {
        service_name: service_name.to_string(),
        message: message.to_string(),
    }
}

pub fn internal_error<T: fmt::Display>(message: T) -> CalmirrorError {
    CalmirrorError::InternalError(message.to_string())
}
