//! Mapping of domain failures onto HTTP responses

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use st_core::errors::{AuthError, DomainError, TokenError};
use st_shared::error_codes;

use crate::dto::{ErrorResponse, ErrorResponseExt};

/// Domain error carried through actix as a response error
///
/// Used by the token filter and the extractors, which have to hand actix an
/// `actix_web::Error`; route handlers call [`handle_domain_error`] directly.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError(DomainError::Auth(err))
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError(DomainError::Token(err))
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        classify(&self.0).0
    }

    fn error_response(&self) -> HttpResponse {
        render(&self.0)
    }
}

/// Converts a domain error into an HTTP response, logging it on the way
pub fn handle_domain_error(error: DomainError) -> HttpResponse {
    render(&error)
}

fn render(error: &DomainError) -> HttpResponse {
    let (status, code, message) = classify(error);

    if status.is_server_error() {
        log::error!("Request failed: {}", error);
    } else {
        log::warn!("Request rejected: {}", error);
    }

    ErrorResponse::new(code, message).to_response(status)
}

/// Status, error code and client-facing message for a domain error
///
/// Tokens that fail to parse or carry a foreign signature are reported as
/// server errors, while an expired token is a plain 401.
fn classify(error: &DomainError) -> (StatusCode, &'static str, String) {
    match error {
        DomainError::Token(TokenError::TokenExpired) => (
            StatusCode::UNAUTHORIZED,
            error_codes::TOKEN_EXPIRED,
            "Session token has expired".to_string(),
        ),
        DomainError::Token(TokenError::InvalidTokenFormat | TokenError::InvalidSignature) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::TOKEN_INVALID,
            "Session token is invalid".to_string(),
        ),
        DomainError::Token(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "Failed to process session token".to_string(),
        ),
        DomainError::Auth(AuthError::InvalidCredentials) => (
            StatusCode::UNAUTHORIZED,
            error_codes::INVALID_CREDENTIALS,
            "Invalid username or password".to_string(),
        ),
        DomainError::Auth(AuthError::UnknownIdentity { .. })
        | DomainError::Auth(AuthError::AuthenticationRequired)
        | DomainError::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            error_codes::UNAUTHORIZED,
            "Authentication required".to_string(),
        ),
        DomainError::Validation { message } => (
            StatusCode::BAD_REQUEST,
            error_codes::VALIDATION_ERROR,
            message.clone(),
        ),
        DomainError::NotFound { resource } => (
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            format!("{} not found", resource),
        ),
        DomainError::Configuration { .. } | DomainError::Internal { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            "An internal error occurred".to_string(),
        ),
    }
}
