use actix_web::HttpResponse;

use crate::dto::auth::PrincipalResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/auth/me
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "name": "alice",
///     "authorities": ["ROLE_ADMIN", "ROLE_USER"]
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: No session token on the request
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(PrincipalResponse::from(&auth))
}
