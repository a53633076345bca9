//! Job-role recommendations for a stored or inline profile.

use crate::error::AppError;
use crate::extractors::{AuthUser, ValidJson};
use crate::models::{NewProfile, RecommendRequest, RecommendResponse, RecommendationSnapshot};
use crate::recommender::Recommender;
use crate::response::{success_one_ok, SuccessOne};
use crate::service::{CatalogService, ProfileService, RecommendationService, RequestValidator};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    response::IntoResponse,
};

#[utoipa::path(
    post,
    path = "/api/recommend",
    request_body = RecommendRequest,
    responses(
        (status = 200, description = "Top job roles with NSQF pathways", body = SuccessOne<RecommendResponse>),
        (status = 400, description = "Neither profile_id nor profile given"),
        (status = 404, description = "Profile not found"),
        (status = 422, description = "No usable skills in the profile"),
    ),
    security(("bearer" = [])),
    tag = "recommendations"
)]
pub async fn recommend(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    ValidJson(body): ValidJson<RecommendRequest>,
) -> Result<impl IntoResponse, AppError> {
    let (profile, stored_id) = match (body.profile_id, &body.profile) {
        (Some(id), _) => {
            let stored = ProfileService::get_owned(&state.pool, user.id, id).await?;
            (NewProfile::from(&stored), Some(stored.id))
        }
        (None, Some(inline)) => (RequestValidator::profile(inline)?, None),
        (None, None) => {
            return Err(AppError::BadRequest(
                "Either profile_id or profile must be provided".into(),
            ))
        }
    };

    let roles = CatalogService::list_job_roles(&state.pool).await?;
    let courses = CatalogService::all_courses(&state.pool).await?;
    let result = Recommender::fit(roles, courses)?.recommend(&profile)?;

    let recommendation_id = match stored_id {
        Some(profile_id) => Some(RecommendationService::create(&state.pool, profile_id, &result).await?),
        None => None,
    };
    tracing::info!(
        user_id = user.id,
        profile_id = ?stored_id,
        recommendations = result.recommendations.len(),
        "recommendations computed"
    );
    Ok(success_one_ok(RecommendResponse {
        recommendation_id,
        recommendations: result,
    }))
}

#[utoipa::path(
    get,
    path = "/api/recommendations/{id}",
    params(("id" = i64, Path, description = "Recommendation id")),
    responses(
        (status = 200, description = "Stored recommendation", body = SuccessOne<RecommendationSnapshot>),
        (status = 404, description = "Recommendation not found"),
    ),
    security(("bearer" = [])),
    tag = "recommendations"
)]
pub async fn read(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let snapshot = RecommendationService::get_owned(&state.pool, user.id, id).await?;
    Ok(success_one_ok(snapshot))
}
