use axum::{
    Form, Json, async_trait,
    extract::{FromRequest, Request, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::auth_dto::*},
    error::AppError,
    security::middleware::AuthUser,
    services::auth::Registration,
};

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Registering user: {}", request.email);

    let user = state
        .auth_service
        .register(Registration {
            username: request.username,
            email: request.email,
            password: request.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Login body, form-encoded (OAuth2 password form) or JSON
pub struct LoginCredentials(pub LoginRequest);

#[async_trait]
impl<S> FromRequest<S> for LoginCredentials
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/json"));

        if is_json {
            Json::<LoginRequest>::from_request(req, state)
                .await
                .map(|Json(body)| Self(body))
                .map_err(IntoResponse::into_response)
        } else {
            Form::<LoginRequest>::from_request(req, state)
                .await
                .map(|Form(body)| Self(body))
                .map_err(IntoResponse::into_response)
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    LoginCredentials(request): LoginCredentials,
) -> Result<impl IntoResponse, AppError> {
    let token = state
        .auth_service
        .login(request.username.trim(), &request.password)
        .await?;

    Ok(Json(TokenResponse::from(token)))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let user = state.auth_service.current_user(&auth.claims.sub).await?;
    Ok(Json(user))
}
