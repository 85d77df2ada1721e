//! Error types for authentication and session token operations
//!
//! The HTTP status each variant maps to is decided in the presentation
//! layer; these types only classify the failure.

use thiserror::Error;

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The identity directory has no entry for the name
    #[error("Unknown identity: {name}")]
    UnknownIdentity { name: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthenticationRequired,
}

/// Token-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token expired")]
    TokenExpired,

    /// Not a three-segment token, or header/claims could not be decoded
    #[error("Invalid token format")]
    InvalidTokenFormat,

    /// Well-formed token whose signature does not match the signing key
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed")]
    TokenGenerationFailed,

    #[error("Key load error: {message}")]
    KeyLoadError { message: String },
}

impl TokenError {
    /// Whether the token itself was rejected (as opposed to an issuance or key failure)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            TokenError::TokenExpired | TokenError::InvalidTokenFormat | TokenError::InvalidSignature
        )
    }
}
