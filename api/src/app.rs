//! Application state and factory
//!
//! This module handles the initialization of the application state
//! and provides the factory for creating the Actix-web application.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpResponse,
};
use st_core::errors::DomainError;
use st_core::repositories::IdentityResolver;
use st_core::services::auth::{AuthService, AuthServiceConfig};
use st_core::services::token::TokenService;
use st_shared::{error_codes, AppConfig};

use crate::dto::{ErrorResponse, ErrorResponseExt};
use crate::middleware::auth::{TokenAuth, TokenAuthenticator};
use crate::routes::{self, AppState};

/// Wires the token and login services around an identity directory
pub fn build_state<I>(config: &AppConfig, directory: I) -> Result<web::Data<AppState<I>>, DomainError>
where
    I: IdentityResolver + 'static,
{
    let token_service = Arc::new(TokenService::from_jwt_config(directory, &config.jwt)?);
    let auth_service = Arc::new(AuthService::new(token_service, AuthServiceConfig::default()));

    Ok(web::Data::new(AppState::new(auth_service)))
}

/// Create and configure the application with all dependencies
pub fn create_app<I>(
    app_state: web::Data<AppState<I>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    I: IdentityResolver + 'static,
{
    let authenticator: Arc<dyn TokenAuthenticator> = app_state.auth_service.token_service().clone();

    App::new()
        // Add application state
        .app_data(app_state)
        // The token filter runs inside the logger so rejections are logged too
        .wrap(TokenAuth::new(authenticator))
        .wrap(Logger::default())
        .configure(routes::configure::<I>)
        // Default 404 handler
        .default_service(web::route().to(not_found))
}

async fn not_found() -> HttpResponse {
    ErrorResponse::new(error_codes::NOT_FOUND, "The requested resource was not found")
        .to_response(actix_web::http::StatusCode::NOT_FOUND)
}
