//! Registration, token issue, and the current user.

use crate::auth::issue_token;
use crate::error::AppError;
use crate::extractors::{AuthUser, ValidJson};
use crate::models::{RegisterRequest, TokenRequest, TokenResponse, User};
use crate::response::{success_one, success_one_ok, SuccessOne};
use crate::service::{RequestValidator, UserService};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = SuccessOne<User>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Invalid email or password"),
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = RequestValidator::registration(&body)?;
    let user = UserService::create(&state.pool, new_user).await?;
    Ok(success_one(user))
}

#[utoipa::path(
    post,
    path = "/api/auth/token",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Bearer token", body = TokenResponse),
        (status = 401, description = "Incorrect email or password"),
        (status = 403, description = "Inactive user"),
    ),
    tag = "auth"
)]
pub async fn token(
    State(state): State<AppState>,
    ValidJson(body): ValidJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let user = UserService::authenticate(&state.pool, &body.email, &body.password).await?;
    let (access_token, expires_in) = issue_token(&state.config.auth, user.id)?;
    tracing::info!(user_id = user.id, "token issued");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
        expires_in,
    }))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = SuccessOne<User>),
        (status = 401, description = "Missing or invalid token"),
    ),
    security(("bearer" = [])),
    tag = "auth"
)]
pub async fn me(AuthUser(user): AuthUser) -> impl IntoResponse {
    success_one_ok(user)
}
