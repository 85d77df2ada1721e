pub mod auth;

pub use auth::{AuthContext, OptionalAuth, TokenAuth, TokenAuthMiddleware, TokenAuthenticator};
