//! Main authentication service implementation

use std::sync::Arc;

use crate::domain::entities::token::IssuedToken;
use crate::errors::{AuthError, DomainError, DomainResult};
use crate::repositories::IdentityResolver;
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;

/// Authentication service issuing session tokens for valid credentials
pub struct AuthService<I: IdentityResolver> {
    /// Token service, also providing the identity directory
    token_service: Arc<TokenService<I>>,
    /// Service configuration
    config: AuthServiceConfig,
}

impl<I: IdentityResolver> AuthService<I> {
    /// Create a new authentication service
    pub fn new(token_service: Arc<TokenService<I>>, config: AuthServiceConfig) -> Self {
        Self {
            token_service,
            config,
        }
    }

    /// The token service logins are issued through
    pub fn token_service(&self) -> &Arc<TokenService<I>> {
        &self.token_service
    }

    /// Checks `password` against the stored credential of `name` and issues a token
    ///
    /// # Returns
    ///
    /// * `Ok(IssuedToken)` - Token carrying the principal's authorities as roles
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown name or wrong password
    /// * `Err(DomainError)` - Directory lookup or token signing failed
    pub async fn login(&self, name: &str, password: &str) -> DomainResult<IssuedToken> {
        let principal = match self.token_service.resolver().load_by_name(name).await {
            Ok(principal) => principal,
            Err(DomainError::Auth(AuthError::UnknownIdentity { .. })) => {
                tracing::warn!(subject = %name, "Login rejected: unknown identity");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        let matches = bcrypt::verify(password, &principal.credential_hash).map_err(|e| {
            tracing::error!(subject = %name, error = %e, "Stored credential hash is unusable");
            DomainError::Internal {
                message: format!("Credential check failed: {}", e),
            }
        })?;

        if !matches {
            tracing::warn!(subject = %name, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = self
            .token_service
            .issue(&principal.name, &principal.authorities)?;

        tracing::info!(subject = %principal.name, "Login succeeded");

        Ok(IssuedToken::new(token, self.token_service.token_ttl_seconds()))
    }

    /// Hashes a plain password into a credential hash for the identity directory
    pub fn hash_credential(&self, password: &str) -> DomainResult<String> {
        bcrypt::hash(password, self.config.bcrypt_cost).map_err(|e| DomainError::Internal {
            message: format!("Credential hashing failed: {}", e),
        })
    }
}
