pub mod auth;
pub mod error;

pub use auth::{LoginRequest, LoginResponse, PrincipalResponse};
pub use error::{ErrorResponse, ErrorResponseExt};
