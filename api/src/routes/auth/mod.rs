//! Authentication route handlers
//!
//! - `POST /login` exchanges a username and password for a session token
//! - `GET /me` describes the caller the session token authenticated

pub mod login;
pub mod me;

use std::sync::Arc;

use st_core::repositories::IdentityResolver;
use st_core::services::auth::AuthService;

/// Application state that holds shared services
pub struct AppState<I>
where
    I: IdentityResolver,
{
    pub auth_service: Arc<AuthService<I>>,
}

impl<I: IdentityResolver> AppState<I> {
    pub fn new(auth_service: Arc<AuthService<I>>) -> Self {
        Self { auth_service }
    }
}
