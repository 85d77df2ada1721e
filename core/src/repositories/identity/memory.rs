//! In-memory identity directory

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::principal::Principal;
use crate::errors::{AuthError, DomainError};

use super::trait_::IdentityResolver;

/// Identity directory keeping principals in a map keyed by name
#[derive(Clone, Default)]
pub struct InMemoryIdentityDirectory {
    principals: Arc<RwLock<HashMap<String, Principal>>>,
}

impl InMemoryIdentityDirectory {
    /// Create an empty directory
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a directory pre-populated with `principals`
    ///
    /// A later principal with the same name replaces an earlier one.
    pub fn with_principals(principals: impl IntoIterator<Item = Principal>) -> Self {
        let principals = principals
            .into_iter()
            .map(|principal| (principal.name.clone(), principal))
            .collect();

        Self {
            principals: Arc::new(RwLock::new(principals)),
        }
    }

    /// Register or replace a principal, returning the one it replaced
    pub async fn insert(&self, principal: Principal) -> Option<Principal> {
        let mut principals = self.principals.write().await;
        principals.insert(principal.name.clone(), principal)
    }

    /// Remove the principal registered under `name`
    pub async fn remove(&self, name: &str) -> Option<Principal> {
        let mut principals = self.principals.write().await;
        principals.remove(name)
    }

    /// Number of registered principals
    pub async fn len(&self) -> usize {
        self.principals.read().await.len()
    }

    /// Whether the directory holds no principals
    pub async fn is_empty(&self) -> bool {
        self.principals.read().await.is_empty()
    }
}

#[async_trait]
impl IdentityResolver for InMemoryIdentityDirectory {
    async fn load_by_name(&self, name: &str) -> Result<Principal, DomainError> {
        let principals = self.principals.read().await;
        principals.get(name).cloned().ok_or_else(|| {
            AuthError::UnknownIdentity {
                name: name.to_string(),
            }
            .into()
        })
    }
}
