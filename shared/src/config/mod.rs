//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Session token signing and transport configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration
//!
//! [`AppConfig::load`] layers built-in defaults, an optional
//! `config.<environment>.toml` file and `APP_`-prefixed environment variables
//! (`APP_JWT__SECRET`, `APP_SERVER__PORT`, ...), then validates the result so a
//! missing signing secret stops the process at startup.

pub mod auth;
pub mod environment;
pub mod server;

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

// Re-export commonly used types
pub use auth::JwtConfig;
pub use environment::{Environment, LoggingConfig};
pub use server::ServerConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Session token configuration
    pub jwt: JwtConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for `environment` from file and process environment
    pub fn load(environment: Environment) -> Result<Self, ConfigError> {
        let builder = Self::defaults(environment)?
            .add_source(File::with_name(environment.config_file()).required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::finish(builder)
    }

    /// Load configuration for `environment` from an inline TOML document
    pub fn from_toml_str(environment: Environment, toml: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults(environment)?.add_source(File::from_str(toml, FileFormat::Toml));

        Self::finish(builder)
    }

    /// Checks every section that must be valid before the server starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.jwt.validate()?;
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                key: "server.port".to_string(),
                message: "must not be 0".to_string(),
            });
        }
        Ok(())
    }

    fn defaults(environment: Environment) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let logging = LoggingConfig::for_environment(environment);

        Ok(config::Config::builder()
            .set_default("environment", environment.to_string())?
            .set_default("logging.level", logging.level)?)
    }

    fn finish(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
