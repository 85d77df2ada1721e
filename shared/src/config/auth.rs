//! Session token configuration

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Default lifetime of an issued session token (1 hour)
pub const DEFAULT_EXPIRATION_SECONDS: i64 = 3600;

/// Longest accepted token lifetime (100 years)
pub const MAX_EXPIRATION_SECONDS: i64 = 100 * 365 * 24 * 60 * 60;

/// Default request header carrying the token
pub const DEFAULT_HEADER_NAME: &str = "Authorization";

/// Default scheme prefix in front of the token value
pub const DEFAULT_HEADER_PREFIX: &str = "Bearer ";

/// JWT session token configuration
#[derive(Clone, Deserialize, Serialize)]
pub struct JwtConfig {
    /// Raw signing secret. Required, must not be empty.
    #[serde(default)]
    pub secret: String,

    /// Token lifetime in seconds
    #[serde(default = "default_expiration_seconds")]
    pub expiration_seconds: i64,

    /// Name of the request header carrying the token
    #[serde(default = "default_header_name")]
    pub header_name: String,

    /// Prefix in front of the token inside the header value
    #[serde(default = "default_header_prefix")]
    pub header_prefix: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_seconds", &self.expiration_seconds)
            .field("header_name", &self.header_name)
            .field("header_prefix", &self.header_prefix)
            .finish()
    }
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            expiration_seconds: default_expiration_seconds(),
            header_name: default_header_name(),
            header_prefix: default_header_prefix(),
        }
    }
}

impl JwtConfig {
    /// Create a new JWT configuration with secret
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ..Default::default()
        }
    }

    /// Set token expiry in seconds
    pub fn with_expiration_seconds(mut self, seconds: i64) -> Self {
        self.expiration_seconds = seconds;
        self
    }

    /// Set the header name and prefix the token travels in
    pub fn with_header(mut self, name: impl Into<String>, prefix: impl Into<String>) -> Self {
        self.header_name = name.into();
        self.header_prefix = prefix.into();
        self
    }

    /// Checks the settings that must hold before any token is signed
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.trim().is_empty() {
            return Err(ConfigError::Missing {
                key: "jwt.secret".to_string(),
            });
        }
        if self.expiration_seconds < 0 {
            return Err(ConfigError::Invalid {
                key: "jwt.expiration_seconds".to_string(),
                message: format!("must not be negative, got {}", self.expiration_seconds),
            });
        }
        if self.expiration_seconds > MAX_EXPIRATION_SECONDS {
            return Err(ConfigError::Invalid {
                key: "jwt.expiration_seconds".to_string(),
                message: format!(
                    "must not exceed {} seconds, got {}",
                    MAX_EXPIRATION_SECONDS, self.expiration_seconds
                ),
            });
        }
        if !is_header_name(&self.header_name) {
            return Err(ConfigError::Invalid {
                key: "jwt.header_name".to_string(),
                message: format!("not a valid HTTP header name: {:?}", self.header_name),
            });
        }
        if !is_header_value(&self.header_prefix) {
            return Err(ConfigError::Invalid {
                key: "jwt.header_prefix".to_string(),
                message: format!("not a valid HTTP header value: {:?}", self.header_prefix),
            });
        }
        Ok(())
    }
}

/// Non-empty RFC 9110 token: letters, digits and ``!#$%&'*+-.^_`|~``
fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}

/// Visible ASCII, space and tab
fn is_header_value(value: &str) -> bool {
    value.bytes().all(|b| b == b'\t' || (0x20..0x7f).contains(&b))
}

fn default_expiration_seconds() -> i64 {
    DEFAULT_EXPIRATION_SECONDS
}

fn default_header_name() -> String {
    String::from(DEFAULT_HEADER_NAME)
}

fn default_header_prefix() -> String {
    String::from(DEFAULT_HEADER_PREFIX)
}
