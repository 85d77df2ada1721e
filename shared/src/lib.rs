//! Shared configuration and error types for the Pyxis session services
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and layered loading
//! - Error response structures and error codes

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, JwtConfig, LoggingConfig, ServerConfig};
pub use errors::{error_codes, ConfigError, ErrorResponse};
