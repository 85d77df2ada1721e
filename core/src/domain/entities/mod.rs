//! Domain entities for session tokens and the identities they assert.

pub mod principal;
pub mod token;

// Re-export commonly used types
pub use principal::{Authentication, Principal, Role};
pub use token::{Claims, IssuedToken, TokenStatus, ROLES_CLAIM, TOKEN_TYPE};
