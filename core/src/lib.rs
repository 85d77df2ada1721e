//! # Pyxis Session Core
//!
//! Core domain layer for signed session tokens: claims and principal
//! entities, the identity-resolver interface, the token service that mints,
//! extracts and verifies tokens, and the login service built on top of it.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
