//! Authentication service module
//!
//! Credential login on top of the token service: the identity directory
//! supplies the principal and its bcrypt credential hash, and a successful
//! password check yields a freshly issued session token.

mod config;
mod service;


pub use config::AuthServiceConfig;
pub use service::AuthService;
