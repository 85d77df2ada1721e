//! Process-level configuration for the API server
//!
//! Wraps the layered [`AppConfig`] and adds what only the binary needs: the
//! location of the identity file the in-memory directory is seeded from.

use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use st_core::domain::entities::Principal;
use st_shared::{AppConfig, ConfigError, Environment};
use thiserror::Error;

/// Environment variable naming the identity file
pub const IDENTITIES_FILE_VAR: &str = "IDENTITIES_FILE";

#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub identities_file: Option<PathBuf>,
}

/// Errors raised while reading the identity file
#[derive(Debug, Error)]
pub enum IdentityFileError {
    #[error("Failed to read identity file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse identity file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk layout of the identity file
///
/// ```toml
/// [[identities]]
/// name = "alice"
/// credential_hash = "$2b$12$..."
/// authorities = ["ROLE_ADMIN", "ROLE_USER"]
/// ```
#[derive(Debug, Deserialize)]
struct IdentityFile {
    #[serde(default)]
    identities: Vec<Principal>,
}

impl Config {
    /// Loads the configuration for the current environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::from_env();

        Ok(Config {
            app: AppConfig::load(environment)?,
            identities_file: env::var(IDENTITIES_FILE_VAR).ok().map(PathBuf::from),
        })
    }

    pub fn is_development(&self) -> bool {
        self.app.environment.is_development()
    }

    pub fn is_production(&self) -> bool {
        self.app.environment.is_production()
    }

    /// Principals to seed the identity directory with
    ///
    /// No configured file means an empty directory.
    pub fn load_identities(&self) -> Result<Vec<Principal>, IdentityFileError> {
        match &self.identities_file {
            Some(path) => read_identities(path),
            None => Ok(Vec::new()),
        }
    }
}

/// Reads principals from an identity file on disk
pub fn read_identities(path: &Path) -> Result<Vec<Principal>, IdentityFileError> {
    let content = std::fs::read_to_string(path).map_err(|source| IdentityFileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_identities(&content)
}

/// Parses principals from identity file content
pub fn parse_identities(content: &str) -> Result<Vec<Principal>, IdentityFileError> {
    let file: IdentityFile = toml::from_str(content)?;
    Ok(file.identities)
}
