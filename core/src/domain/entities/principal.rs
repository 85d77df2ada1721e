//! Principal entities resolved from the identity directory.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A granted role or authority, identified by its name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role {
    name: String,
}

impl Role {
    /// Creates a role with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// The role name as it appears in token claims
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identity record owned by the identity directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Unique identifier for the identity
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Login name, used as the token subject
    pub name: String,

    /// bcrypt hash of the identity's password
    #[serde(skip_serializing, default)]
    pub credential_hash: String,

    /// Granted authorities
    #[serde(default)]
    pub authorities: Vec<Role>,
}

impl Principal {
    /// Creates a new principal with a fresh identifier
    pub fn new(
        name: impl Into<String>,
        credential_hash: impl Into<String>,
        authorities: Vec<Role>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            credential_hash: credential_hash.into(),
            authorities,
        }
    }
}

/// An authenticated principal attached to a request
///
/// Carries the resolved principal, an empty credential placeholder (the
/// token has already proven the identity) and the granted authorities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    pub principal: Principal,
    pub credentials: String,
    pub authorities: Vec<Role>,
}

impl Authentication {
    /// Wraps a resolved principal into an authenticated principal
    pub fn new(principal: Principal) -> Self {
        let authorities = principal.authorities.clone();
        Self {
            principal,
            credentials: String::new(),
            authorities,
        }
    }

    /// Name of the authenticated identity
    pub fn name(&self) -> &str {
        &self.principal.name
    }

    /// Whether the authority named `authority` was granted
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.iter().any(|role| role.name() == authority)
    }
}
