//! Session token filter for the HTTP surface.
//!
//! Runs once per request. When the configured header carries a token with the
//! configured prefix, the token is verified and its subject resolved through
//! the identity directory; the resulting [`AuthContext`] is stored in the
//! request extensions for handlers to extract. Requests without a token pass
//! through anonymously and are turned away later by the [`AuthContext`]
//! extractor on endpoints that need a caller.

use actix_web::{
    body::EitherBody,
    dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform},
    Error, FromRequest, HttpMessage, HttpRequest,
};
use async_trait::async_trait;
use futures_util::future::LocalBoxFuture;
use st_core::{
    domain::entities::{Authentication, Role},
    errors::{AuthError, DomainError, TokenError},
    repositories::IdentityResolver,
    services::token::TokenService,
};
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::handlers::error::ApiError;

/// Authenticated caller injected into requests
#[derive(Debug, Clone)]
pub struct AuthContext {
    authentication: Authentication,
}

impl AuthContext {
    pub fn new(authentication: Authentication) -> Self {
        Self { authentication }
    }

    /// Name of the authenticated identity (the token subject)
    pub fn name(&self) -> &str {
        self.authentication.name()
    }

    /// Directory id of the authenticated principal
    pub fn principal_id(&self) -> Uuid {
        self.authentication.principal.id
    }

    pub fn authorities(&self) -> &[Role] {
        &self.authentication.authorities
    }

    pub fn has_authority(&self, authority: &str) -> bool {
        self.authentication.has_authority(authority)
    }

    pub fn authentication(&self) -> &Authentication {
        &self.authentication
    }
}

/// Token operations the filter depends on
///
/// Implemented for [`TokenService`] so the middleware can hold any directory
/// behind a single trait object.
#[async_trait]
pub trait TokenAuthenticator: Send + Sync {
    /// Name of the request header carrying the token
    fn header_name(&self) -> &str;

    /// Strips the configured prefix from a header value
    fn extract_token<'a>(&self, header_value: Option<&'a str>) -> Option<&'a str>;

    /// `Ok(true)` valid, `Ok(false)` expired, `Err` malformed or foreign signature
    fn verify(&self, token: &str) -> Result<bool, DomainError>;

    async fn resolve_authentication(&self, token: &str) -> Result<Authentication, DomainError>;
}

#[async_trait]
impl<I: IdentityResolver + 'static> TokenAuthenticator for TokenService<I> {
    fn header_name(&self) -> &str {
        TokenService::header_name(self)
    }

    fn extract_token<'a>(&self, header_value: Option<&'a str>) -> Option<&'a str> {
        self.extract_from_header(header_value)
    }

    fn verify(&self, token: &str) -> Result<bool, DomainError> {
        TokenService::verify(self, token)
    }

    async fn resolve_authentication(&self, token: &str) -> Result<Authentication, DomainError> {
        TokenService::resolve_authentication(self, token).await
    }
}

/// Verifies a token and resolves its subject
///
/// An expired token is reported as [`TokenError::TokenExpired`] so the
/// caller sees a 401 rather than a server error.
pub async fn authenticate(
    authenticator: &dyn TokenAuthenticator,
    token: &str,
) -> Result<Authentication, DomainError> {
    if !authenticator.verify(token)? {
        return Err(TokenError::TokenExpired.into());
    }

    authenticator.resolve_authentication(token).await
}

/// Session token middleware factory
#[derive(Clone)]
pub struct TokenAuth {
    authenticator: Arc<dyn TokenAuthenticator>,
}

impl TokenAuth {
    /// Creates the filter around a token service
    pub fn new(authenticator: Arc<dyn TokenAuthenticator>) -> Self {
        Self { authenticator }
    }
}

impl<S, B> Transform<S, ServiceRequest> for TokenAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = TokenAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenAuthMiddleware {
            service: Rc::new(service),
            authenticator: Arc::clone(&self.authenticator),
        }))
    }
}

/// Session token middleware service
pub struct TokenAuthMiddleware<S> {
    service: Rc<S>,
    authenticator: Arc<dyn TokenAuthenticator>,
}

impl<S, B> Service<ServiceRequest> for TokenAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = Arc::clone(&self.authenticator);

        Box::pin(async move {
            let token = req
                .headers()
                .get(authenticator.header_name())
                .and_then(|value| value.to_str().ok())
                .and_then(|value| authenticator.extract_token(Some(value)))
                .map(str::to_owned);

            if let Some(token) = token {
                match authenticate(&*authenticator, &token).await {
                    Ok(authentication) => {
                        log::debug!("Authenticated request as {}", authentication.name());
                        req.extensions_mut().insert(AuthContext::new(authentication));
                    }
                    Err(e) => {
                        let response = req.error_response(ApiError::from(e));
                        return Ok(response.map_into_right_body());
                    }
                }
            }

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extractor for the authenticated caller
///
/// Fails with 401 when the request carried no usable token.
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result: Result<Self, Self::Error> = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::from(AuthError::AuthenticationRequired).into());

        ready(result)
    }
}

/// Optional authentication extractor for endpoints open to anonymous callers
pub struct OptionalAuth(pub Option<AuthContext>);

impl FromRequest for OptionalAuth {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(OptionalAuth(req.extensions().get::<AuthContext>().cloned())))
    }
}
