//! Token service module for signed session tokens
//!
//! This module handles all token-related operations:
//! - HS512 token issuance from a subject and its roles
//! - Token extraction from the configured request header
//! - Signature and expiry verification
//! - Resolution of a token into an authenticated principal

mod config;
mod service;

#[cfg(test)]
mod tests;

pub use config::TokenServiceConfig;
pub use service::{TokenService, SIGNING_ALGORITHM};
