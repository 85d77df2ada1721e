//! Shared fixtures for the HTTP integration tests

#![allow(dead_code)]

use actix_web::web;
use chrono::Duration;
use st_api::app::build_state;
use st_api::routes::AppState;
use st_core::domain::entities::{Principal, Role};
use st_core::repositories::InMemoryIdentityDirectory;
use st_core::services::token::{TokenService, TokenServiceConfig};
use st_shared::{AppConfig, JwtConfig};

pub const SECRET: &str = "api-test-signing-secret";
pub const PASSWORD: &str = "correct horse battery staple";

/// Directory holding `alice` with two authorities
pub fn directory() -> InMemoryIdentityDirectory {
    let hash = bcrypt::hash(PASSWORD, 4).unwrap();
    InMemoryIdentityDirectory::with_principals(vec![Principal::new(
        "alice",
        hash,
        vec![Role::new("ROLE_ADMIN"), Role::new("ROLE_USER")],
    )])
}

pub fn config_with(jwt: JwtConfig) -> AppConfig {
    AppConfig {
        jwt,
        ..AppConfig::default()
    }
}

pub fn state() -> web::Data<AppState<InMemoryIdentityDirectory>> {
    state_with(JwtConfig::new(SECRET))
}

pub fn state_with(jwt: JwtConfig) -> web::Data<AppState<InMemoryIdentityDirectory>> {
    build_state(&config_with(jwt), directory()).unwrap()
}

/// Token service with its own empty directory, for minting tokens out of band
pub fn minting_service(secret: &str) -> TokenService<InMemoryIdentityDirectory> {
    TokenService::new(
        InMemoryIdentityDirectory::new(),
        TokenServiceConfig::new(secret, Duration::hours(1)),
    )
    .unwrap()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}
