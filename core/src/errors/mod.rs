//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Resource not found: {resource}")]
    NotFound { resource: String },

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<st_shared::ConfigError> for DomainError {
    fn from(err: st_shared::ConfigError) -> Self {
        DomainError::Configuration {
            message: err.to_string(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
