pub mod auth;

use actix_web::{web, HttpResponse};
use st_core::repositories::IdentityResolver;

pub use auth::AppState;

/// Registers every route of the service
///
/// The application state must already be registered as
/// `web::Data<AppState<I>>`.
pub fn configure<I>(cfg: &mut web::ServiceConfig)
where
    I: IdentityResolver + 'static,
{
    cfg.route("/health", web::get().to(health_check)).service(
        web::scope("/api/v1").service(
            web::scope("/auth")
                .route("/login", web::post().to(auth::login::login::<I>))
                .route("/me", web::get().to(auth::me::me)),
        ),
    );
}

async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}
