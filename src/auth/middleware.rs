// Authentication middleware for protected routes

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::auth::{
    error::AuthError,
    token::{TokenClaims, TokenService},
};

/// Authorization scheme accepted in the `Authorization` header
pub const BEARER_SCHEME: &str = "Bearer";

/// Identity attached to a request once its bearer token has been validated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub username: String,
    pub claims: TokenClaims,
}

impl From<TokenClaims> for AuthenticatedUser {
    fn from(claims: TokenClaims) -> Self {
        Self {
            username: claims.username.clone(),
            claims,
        }
    }
}

/// Pull the bearer token out of the request headers
///
/// The header must read `Bearer <token>`; the token is the second
/// whitespace-separated segment. Anything else counts as no token presented.
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::Unauthorized)?
        .to_str()
        .map_err(|_| AuthError::Unauthorized)?;

    let mut segments = value.split_whitespace();
    match (segments.next(), segments.next()) {
        (Some(scheme), Some(token)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => Ok(token),
        _ => Err(AuthError::Unauthorized),
    }
}

/// Validate the request's bearer token and resolve the caller's identity
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<AuthenticatedUser, AuthError> {
    let token = extract_bearer(headers)?;
    let claims = tokens.decode(token)?;
    Ok(AuthenticatedUser::from(claims))
}

/// Middleware guarding protected routes
///
/// On success the decoded identity is stored in the request extensions and
/// control passes to the next handler.
pub async fn require_auth(
    State(tokens): State<Arc<TokenService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let endpoint = request.uri().path().to_string();

    let user = authenticate(request.headers(), &tokens).inspect_err(|e| {
        warn!("Rejected request to {}: {}", endpoint, e);
    })?;

    debug!("Authenticated {} for {}", user.username, endpoint);
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Only populated behind `require_auth`
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AuthError::Unauthorized)
    }
}
