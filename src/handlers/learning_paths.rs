//! Learning paths and their items, scoped to the caller.

use crate::assistant::{default_path, generate_path, PathRequest};
use crate::error::AppError;
use crate::extractors::{AuthUser, ValidJson};
use crate::models::{
    GenerateQuery, LearningPath, LearningPathCreate, LearningPathItem, LearningPathItemCreate, LearningPathQuery,
    LearningPathUpdate,
};
use crate::response::{success_many, success_one, success_one_ok, SuccessMany, SuccessOne};
use crate::service::{LearningPathService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/learning-paths",
    params(LearningPathQuery),
    responses((status = 200, description = "The caller's learning paths", body = SuccessMany<LearningPath>)),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<LearningPathQuery>,
) -> Result<impl IntoResponse, AppError> {
    let paths = LearningPathService::list(&state.pool, user.id, &query).await?;
    Ok(success_many(paths))
}

#[utoipa::path(
    post,
    path = "/api/learning-paths",
    request_body = LearningPathCreate,
    responses(
        (status = 201, description = "Learning path created", body = SuccessOne<LearningPath>),
        (status = 422, description = "Invalid title or item"),
    ),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(body): ValidJson<LearningPathCreate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::learning_path(&body)?;
    let path = LearningPathService::create(&state.pool, user.id, &body).await?;
    Ok(success_one(path))
}

#[utoipa::path(
    get,
    path = "/api/learning-paths/{id}",
    params(("id" = i64, Path, description = "Learning path id")),
    responses(
        (status = 200, description = "Learning path with items", body = SuccessOne<LearningPath>),
        (status = 404, description = "Learning path not found"),
    ),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let path = LearningPathService::get(&state.pool, user.id, id).await?;
    Ok(success_one_ok(path))
}

#[utoipa::path(
    put,
    path = "/api/learning-paths/{id}",
    params(("id" = i64, Path, description = "Learning path id")),
    request_body = LearningPathUpdate,
    responses(
        (status = 200, description = "Updated learning path", body = SuccessOne<LearningPath>),
        (status = 404, description = "Learning path not found"),
    ),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn update(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<LearningPathUpdate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::learning_path_update(&body)?;
    let path = LearningPathService::update(&state.pool, user.id, id, &body).await?;
    Ok(success_one_ok(path))
}

#[utoipa::path(
    delete,
    path = "/api/learning-paths/{id}",
    params(("id" = i64, Path, description = "Learning path id")),
    responses(
        (status = 204, description = "Deleted with its items"),
        (status = 404, description = "Learning path not found"),
    ),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    LearningPathService::delete(&state.pool, user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/learning-paths/{id}/items",
    params(("id" = i64, Path, description = "Learning path id")),
    request_body = LearningPathItemCreate,
    responses(
        (status = 201, description = "Item added", body = SuccessOne<LearningPathItem>),
        (status = 404, description = "Learning path not found"),
    ),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn add_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
    ValidJson(body): ValidJson<LearningPathItemCreate>,
) -> Result<impl IntoResponse, AppError> {
    RequestValidator::learning_path_item(&body)?;
    let item = LearningPathService::add_item(&state.pool, user.id, id, &body).await?;
    Ok(success_one(item))
}

#[utoipa::path(
    post,
    path = "/api/learning-paths/generate",
    params(GenerateQuery),
    responses(
        (status = 201, description = "Generated and stored learning path", body = SuccessOne<LearningPath>),
        (status = 400, description = "Topic shorter than 2 or longer than 180 characters"),
    ),
    security(("bearer" = [])),
    tag = "learning-paths"
)]
pub async fn generate(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Query(query): Query<GenerateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let request = PathRequest::from_query(&query)?;
    let mut body = generate_path(state.llm(), &request).await;
    if let Err(error) = RequestValidator::learning_path(&body) {
        tracing::warn!(%error, "generated learning path failed validation; using default path");
        body = default_path(&request);
    }
    let path = LearningPathService::create(&state.pool, user.id, &body).await?;
    Ok(success_one(path))
}
