//! Learner profiles owned by the caller.

use crate::error::AppError;
use crate::extractors::{AuthUser, ValidJson};
use crate::models::{Profile, ProfileInput, ProfileUpdate, RecommendationSnapshot, SnapshotQuery};
use crate::response::{success_many, success_one, success_one_ok, SuccessMany, SuccessOne};
use crate::service::{ProfileService, RecommendationService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = ProfileInput,
    responses(
        (status = 201, description = "Profile stored", body = SuccessOne<Profile>),
        (status = 422, description = "Invalid level, pace or aspirations"),
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(body): ValidJson<ProfileInput>,
) -> Result<impl IntoResponse, AppError> {
    let profile = RequestValidator::profile(&body)?;
    let stored = ProfileService::create(&state.pool, user.id, &profile).await?;
    Ok(success_one(stored))
}

#[utoipa::path(
    get,
    path = "/api/profile",
    responses((status = 200, description = "The caller's profiles", body = SuccessMany<Profile>)),
    security(("bearer" = [])),
    tag = "profiles"
)]
pub async fn list(State(state): State<AppState>, AuthUser(user): AuthUser) -> Result<impl IntoResponse, AppError> {
    let profiles = ProfileService::list_for_user(&state.pool, user.id).await?;
    Ok(success_many(profiles))
}

#[utoipa::path(
    get,
    path = "/api/profile/{id}",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 200, description = "Profile", body = SuccessOne<Profile>),
        (status = 404, description = "Profile not found"),
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
pub async fn read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let profile = ProfileService::get_owned(&state.pool, user.id, id).await?;
    Ok(success_one_ok(profile))
}

#[utoipa::path(
    put,
    path = "/api/profile/{id}",
    params(("id" = i64, Path, description = "Profile id")),
    request_body = ProfileUpdate,
    responses(
        (status = 200, description = "Updated profile", body = SuccessOne<Profile>),
        (status = 404, description = "Profile not found"),
        (status = 422, description = "Invalid field"),
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<ProfileUpdate>,
) -> Result<impl IntoResponse, AppError> {
    let existing = ProfileService::get_owned(&state.pool, user.id, id).await?;
    let merged = RequestValidator::profile_update(&existing, &body)?;
    let updated = ProfileService::update(&state.pool, user.id, id, &merged).await?;
    tracing::debug!(profile_id = id, "profile updated");
    Ok(success_one_ok(updated))
}

#[utoipa::path(
    get,
    path = "/api/profile/{id}/recommendations",
    params(("id" = i64, Path, description = "Profile id"), SnapshotQuery),
    responses(
        (status = 200, description = "Stored recommendations, newest first", body = SuccessMany<RecommendationSnapshot>),
        (status = 404, description = "Profile not found"),
    ),
    security(("bearer" = [])),
    tag = "profiles"
)]
pub async fn recommendations(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<SnapshotQuery>,
) -> Result<impl IntoResponse, AppError> {
    let profile = ProfileService::get_owned(&state.pool, user.id, id).await?;
    let snapshots = RecommendationService::latest_for_profile(&state.pool, profile.id, query.limit).await?;
    Ok(success_many(snapshots))
}
