//! Main token service implementation

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use st_shared::config::auth::MAX_EXPIRATION_SECONDS;
use st_shared::JwtConfig;

use crate::domain::entities::principal::{Authentication, Role};
use crate::domain::entities::token::{Claims, TokenStatus};
use crate::errors::{DomainError, TokenError};
use crate::repositories::IdentityResolver;

use super::config::TokenServiceConfig;

/// Algorithm every session token is signed with
pub const SIGNING_ALGORITHM: Algorithm = Algorithm::HS512;

/// Service minting, extracting and verifying signed session tokens
///
/// The service holds no mutable state: the signing key is normalized once in
/// [`TokenService::new`] and only read afterwards, so a single instance can be
/// shared across request handlers without locking.
pub struct TokenService<I: IdentityResolver> {
    resolver: I,
    config: TokenServiceConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl<I: IdentityResolver> std::fmt::Debug for TokenService<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("config", &self.config)
            .field("algorithm", &SIGNING_ALGORITHM)
            .finish()
    }
}

impl<I: IdentityResolver> TokenService<I> {
    /// Creates a new token service instance
    ///
    /// # Arguments
    ///
    /// * `resolver` - Identity directory used to resolve token subjects
    /// * `config` - Token service configuration
    ///
    /// # Returns
    ///
    /// * `Ok(TokenService)` - Keys derived from the signing secret
    /// * `Err(DomainError::Configuration)` - Empty secret, negative or oversized lifetime
    /// * `Err(DomainError::Token(TokenError::KeyLoadError))` - Key derivation failed
    pub fn new(resolver: I, config: TokenServiceConfig) -> Result<Self, DomainError> {
        if config.signing_secret.trim().is_empty() {
            return Err(DomainError::Configuration {
                message: "signing secret must not be empty".to_string(),
            });
        }
        if config.token_ttl < Duration::zero() {
            return Err(DomainError::Configuration {
                message: format!("token lifetime must not be negative, got {}", config.token_ttl),
            });
        }
        if config.token_ttl > Duration::seconds(MAX_EXPIRATION_SECONDS) {
            return Err(DomainError::Configuration {
                message: format!(
                    "token lifetime must not exceed {} seconds, got {}",
                    MAX_EXPIRATION_SECONDS, config.token_ttl
                ),
            });
        }

        // The raw secret is base64-encoded once; the keys decode it back to the
        // HMAC key bytes.
        let normalized = STANDARD.encode(config.signing_secret.as_bytes());
        let encoding_key = EncodingKey::from_base64_secret(&normalized).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Invalid signing secret: {}", e),
            })
        })?;
        let decoding_key = DecodingKey::from_base64_secret(&normalized).map_err(|e| {
            DomainError::Token(TokenError::KeyLoadError {
                message: format!("Invalid signing secret: {}", e),
            })
        })?;

        // Expiry is reported through TokenStatus::Expired rather than as a
        // decode error.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self {
            resolver,
            config,
            encoding_key,
            decoding_key,
            validation,
        })
    }

    /// Creates a token service from the application's JWT settings
    pub fn from_jwt_config(resolver: I, config: &JwtConfig) -> Result<Self, DomainError> {
        Self::new(resolver, TokenServiceConfig::try_from(config)?)
    }

    /// Identity directory used to resolve token subjects
    pub fn resolver(&self) -> &I {
        &self.resolver
    }

    /// The configuration the service was built with
    pub fn config(&self) -> &TokenServiceConfig {
        &self.config
    }

    /// Name of the request header carrying the token
    pub fn header_name(&self) -> &str {
        &self.config.header_name
    }

    /// Prefix in front of the token inside the header value
    pub fn header_prefix(&self) -> &str {
        &self.config.header_prefix
    }

    /// Lifetime of issued tokens in seconds
    pub fn token_ttl_seconds(&self) -> i64 {
        self.config.token_ttl.num_seconds()
    }

    /// Issues a token for `subject` carrying `roles` in the given order
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - Compact `header.claims.signature` token
    /// * `Err(DomainError::Token(TokenError::TokenGenerationFailed))` - Signing failed
    pub fn issue(&self, subject: &str, roles: &[Role]) -> Result<String, DomainError> {
        self.issue_at(subject, roles, Utc::now())
    }

    /// Issues a token as if the clock read `issued_at`
    pub fn issue_at(
        &self,
        subject: &str,
        roles: &[Role],
        issued_at: DateTime<Utc>,
    ) -> Result<String, DomainError> {
        let claims = Claims::new(subject, roles, issued_at, self.config.token_ttl).map_err(|e| {
            tracing::error!(subject = %subject, "Token expiry is out of range");
            DomainError::Token(e)
        })?;
        let token = self.encode_jwt(&claims)?;

        tracing::debug!(
            subject = %claims.sub,
            roles = claims.roles.len(),
            expires_at = claims.exp,
            "Issued session token"
        );

        Ok(token)
    }

    /// Encodes claims into a signed token
    pub(crate) fn encode_jwt(&self, claims: &Claims) -> Result<String, DomainError> {
        let header = Header::new(SIGNING_ALGORITHM);
        encode(&header, claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign session token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    /// Recovers the raw token from a header value
    ///
    /// Returns `None` when the header is absent, does not start with the
    /// configured prefix, or carries nothing after it. Exactly the configured
    /// prefix is removed, whatever its length.
    pub fn extract_from_header<'a>(&self, header_value: Option<&'a str>) -> Option<&'a str> {
        header_value?
            .strip_prefix(self.config.header_prefix.as_str())
            .filter(|token| !token.is_empty())
    }

    /// Inspects a token against the signing key and the current time
    pub fn inspect(&self, token: &str) -> TokenStatus {
        self.inspect_at(token, Utc::now())
    }

    /// Inspects a token against the signing key as if the clock read `now`
    pub fn inspect_at(&self, token: &str, now: DateTime<Utc>) -> TokenStatus {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) if data.claims.is_expired_at(now) => TokenStatus::Expired(data.claims),
            Ok(data) => TokenStatus::Valid(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::InvalidSignature) => TokenStatus::BadSignature,
            Err(e) => {
                tracing::debug!(error = %e, "Session token could not be decoded");
                TokenStatus::Malformed
            }
        }
    }

    /// Returns the subject of a correctly signed token
    ///
    /// Expiry is not checked here; callers gate on [`TokenService::verify`].
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The `sub` claim
    /// * `Err(DomainError::Token(TokenError::InvalidTokenFormat))` - Token cannot be parsed
    /// * `Err(DomainError::Token(TokenError::InvalidSignature))` - Signature mismatch
    pub fn subject_of(&self, token: &str) -> Result<String, DomainError> {
        match self.inspect(token) {
            TokenStatus::Valid(claims) | TokenStatus::Expired(claims) => Ok(claims.sub),
            TokenStatus::Malformed => Err(TokenError::InvalidTokenFormat.into()),
            TokenStatus::BadSignature => Err(TokenError::InvalidSignature.into()),
        }
    }

    /// Verifies a token
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - Correctly signed and not expired
    /// * `Ok(false)` - Correctly signed but expired
    /// * `Err(DomainError::Token(_))` - Malformed token or signature mismatch
    pub fn verify(&self, token: &str) -> Result<bool, DomainError> {
        self.verify_at(token, Utc::now())
    }

    /// Verifies a token as if the clock read `now`
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<bool, DomainError> {
        match self.inspect_at(token, now) {
            TokenStatus::Valid(_) => Ok(true),
            TokenStatus::Expired(claims) => {
                tracing::debug!(subject = %claims.sub, "Session token expired");
                Ok(false)
            }
            TokenStatus::Malformed => {
                tracing::warn!("Rejected malformed session token");
                Err(TokenError::InvalidTokenFormat.into())
            }
            TokenStatus::BadSignature => {
                tracing::warn!("Rejected session token with invalid signature");
                Err(TokenError::InvalidSignature.into())
            }
        }
    }

    /// Resolves a token into an authenticated principal
    ///
    /// Expiry is not checked: an expired but correctly signed token still
    /// resolves, so callers must gate on [`TokenService::verify`] first.
    /// Errors from the identity directory are returned unchanged.
    pub async fn resolve_authentication(&self, token: &str) -> Result<Authentication, DomainError> {
        let subject = self.subject_of(token)?;
        let principal = self.resolver.load_by_name(&subject).await?;

        Ok(Authentication::new(principal))
    }
}
