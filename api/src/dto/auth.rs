use serde::{Deserialize, Serialize};
use st_core::domain::entities::IssuedToken;
use validator::Validate;

use crate::middleware::auth::AuthContext;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Name the identity directory knows the principal by
    #[validate(length(min = 1, max = 255))]
    pub username: String,

    #[validate(length(min = 1, max = 1024))]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Seconds until the token expires
    pub expires_in: i64,
}

impl From<IssuedToken> for LoginResponse {
    fn from(issued: IssuedToken) -> Self {
        Self {
            token: issued.token,
            token_type: issued.token_type,
            expires_in: issued.expires_in,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrincipalResponse {
    pub name: String,
    pub authorities: Vec<String>,
}

impl From<&AuthContext> for PrincipalResponse {
    fn from(auth: &AuthContext) -> Self {
        Self {
            name: auth.name().to_string(),
            authorities: auth
                .authorities()
                .iter()
                .map(|role| role.name().to_string())
                .collect(),
        }
    }
}
