//! Configuration for the token service

use chrono::Duration;
use st_shared::config::auth::{DEFAULT_HEADER_NAME, DEFAULT_HEADER_PREFIX};
use st_shared::{ConfigError, JwtConfig};

/// Configuration for the token service
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// Raw signing secret, normalized once when the service is built
    pub signing_secret: String,
    /// Lifetime of issued tokens
    pub token_ttl: Duration,
    /// Request header carrying the token
    pub header_name: String,
    /// Prefix in front of the token inside the header value
    pub header_prefix: String,
}

impl TokenServiceConfig {
    /// Create a configuration with default header settings
    pub fn new(signing_secret: impl Into<String>, token_ttl: Duration) -> Self {
        Self {
            signing_secret: signing_secret.into(),
            token_ttl,
            header_name: DEFAULT_HEADER_NAME.to_string(),
            header_prefix: DEFAULT_HEADER_PREFIX.to_string(),
        }
    }

    /// Set the header name and prefix the token travels in
    pub fn with_header(mut self, name: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.header_name = name.into();
        self.header_prefix = prefix.into();
        self
    }
}

impl TryFrom<&JwtConfig> for TokenServiceConfig {
    type Error = ConfigError;

    /// Validates the settings, then converts the lifetime into a duration
    fn try_from(config: &JwtConfig) -> Result<Self, Self::Error> {
        config.validate()?;
        let token_ttl =
            Duration::try_seconds(config.expiration_seconds).ok_or_else(|| ConfigError::Invalid {
                key: "jwt.expiration_seconds".to_string(),
                message: format!("out of range, got {}", config.expiration_seconds),
            })?;

        Ok(Self {
            signing_secret: config.secret.clone(),
            token_ttl,
            header_name: config.header_name.clone(),
            header_prefix: config.header_prefix.clone(),
        })
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("signing_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("header_name", &self.header_name)
            .field("header_prefix", &self.header_prefix)
            .finish()
    }
}
