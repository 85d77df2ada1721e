//! Unit tests for the in-memory identity directory

use std::sync::Arc;

use crate::domain::entities::principal::{Principal, Role};
use crate::errors::{AuthError, DomainError};
use crate::repositories::identity::{IdentityResolver, InMemoryIdentityDirectory};

fn principal(name: &str) -> Principal {
    Principal::new(name, "$2b$04$hash", vec![Role::new("ROLE_USER")])
}

#[tokio::test]
async fn test_load_registered_principal() {
    let directory = InMemoryIdentityDirectory::with_principals(vec![principal("alice")]);

    let found = directory.load_by_name("alice").await.unwrap();
    assert_eq!(found.name, "alice");
    assert_eq!(found.authorities, vec![Role::new("ROLE_USER")]);
}

#[tokio::test]
async fn test_unknown_name_fails_with_unknown_identity() {
    let directory = InMemoryIdentityDirectory::new();

    let err = directory.load_by_name("ghost").await.unwrap_err();
    assert!(matches!(
        err,
        DomainError::Auth(AuthError::UnknownIdentity { ref name }) if name == "ghost"
    ));
}

#[tokio::test]
async fn test_lookup_is_case_sensitive() {
    let directory = InMemoryIdentityDirectory::with_principals(vec![principal("alice")]);

    assert!(directory.load_by_name("Alice").await.is_err());
}

#[tokio::test]
async fn test_insert_replaces_and_remove() {
    let directory = InMemoryIdentityDirectory::new();
    assert!(directory.is_empty().await);

    assert!(directory.insert(principal("bob")).await.is_none());
    let replaced = directory.insert(principal("bob")).await;
    assert!(replaced.is_some());
    assert_eq!(directory.len().await, 1);

    assert!(directory.remove("bob").await.is_some());
    assert!(directory.load_by_name("bob").await.is_err());
}

#[tokio::test]
async fn test_clones_share_state() {
    let directory = InMemoryIdentityDirectory::new();
    let clone = directory.clone();

    directory.insert(principal("carol")).await;
    assert!(clone.load_by_name("carol").await.is_ok());
}

#[tokio::test]
async fn test_resolver_through_arc() {
    let directory: Arc<dyn IdentityResolver> =
        Arc::new(InMemoryIdentityDirectory::with_principals(vec![principal("dave")]));

    let found = directory.load_by_name("dave").await.unwrap();
    assert_eq!(found.name, "dave");
}
