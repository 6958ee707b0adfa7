//! Security Middleware Module
//!
//! Security headers middleware and bearer-token extractors for handlers.

use axum::{
    async_trait,
    body::Body,
    extract::{FromRequestParts, Request},
    http::{HeaderValue, StatusCode, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::result::Result as StdResult;
use tracing::debug;

use crate::api::app_state::AppState;
use crate::error::AppError;
use crate::models::user::User;
use crate::security::auth::{Claims, Credentials};

/// Extract credentials from request headers
fn extract_credentials(parts: &Parts) -> Credentials {
    let auth_header = parts
        .headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    Credentials::from_authorization_header(auth_header)
}

async fn resolve_user(state: &AppState, credentials: &Credentials) -> StdResult<AuthUser, AppError> {
    let claims = state.jwt_auth.authenticate(credentials)?;
    let user = state
        .user_repository
        .find_by_email(&claims.sub)
        .await?
        .ok_or_else(|| AppError::Authentication("User no longer exists".to_string()))?;

    Ok(AuthUser { claims, user })
}

/// Authenticated user, rejects the request with 401 when the token is missing or invalid
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub claims: Claims,
    pub user: User,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> StdResult<Self, Self::Rejection> {
        resolve_user(state, &extract_credentials(parts)).await
    }
}

/// Optionally authenticated user
///
/// A missing header yields `None`. A header that is present but invalid is still
/// rejected so that clients notice expired tokens.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub Option<AuthUser>);

#[async_trait]
impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> StdResult<Self, Self::Rejection> {
        let credentials = extract_credentials(parts);
        if credentials.bearer_token.is_none() {
            debug!("No bearer token, continuing anonymously");
            return Ok(MaybeAuthUser(None));
        }
        resolve_user(state, &credentials).await.map(|u| MaybeAuthUser(Some(u)))
    }
}

/// Security headers middleware
pub async fn security_headers_middleware(
    req: Request<Body>,
    next: Next,
) -> StdResult<Response, StatusCode> {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert("X-Content-Type-Options", HeaderValue::from_static("nosniff"));
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Permissions-Policy",
        HeaderValue::from_static("geolocation=(), microphone=(), camera=()"),
    );

    Ok(response)
}
