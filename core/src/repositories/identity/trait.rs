//! Identity resolver trait for looking up principals by name.
//!
//! The token service only needs one capability from the identity store:
//! turning a token subject back into a principal. Implementations may be
//! backed by a database, a remote directory or an in-memory map.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::principal::Principal;
use crate::errors::DomainError;

/// Directory lookup used to resolve token subjects into principals
///
/// # Example Implementation
/// ```no_run
/// use async_trait::async_trait;
/// use st_core::domain::entities::Principal;
/// use st_core::errors::{AuthError, DomainError};
/// use st_core::repositories::IdentityResolver;
///
/// struct LdapDirectory;
///
/// #[async_trait]
/// impl IdentityResolver for LdapDirectory {
///     async fn load_by_name(&self, name: &str) -> Result<Principal, DomainError> {
///         Err(AuthError::UnknownIdentity { name: name.to_string() }.into())
///     }
/// }
/// ```
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Load the principal registered under `name`
    ///
    /// # Returns
    /// * `Ok(Principal)` - Identity found
    /// * `Err(DomainError::Auth(AuthError::UnknownIdentity))` - No such identity
    /// * `Err(DomainError)` - The directory itself failed
    async fn load_by_name(&self, name: &str) -> Result<Principal, DomainError>;
}

#[async_trait]
impl<T: IdentityResolver + ?Sized> IdentityResolver for Arc<T> {
    async fn load_by_name(&self, name: &str) -> Result<Principal, DomainError> {
        (**self).load_by_name(name).await
    }
}
