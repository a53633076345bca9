//! Read-only NSQF catalog and job roles. No authentication.

use crate::error::AppError;
use crate::models::{CourseQuery, JobRole, NsqfCourse};
use crate::response::{success_many, success_one_ok, SuccessMany, SuccessOne};
use crate::service::CatalogService;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};

#[utoipa::path(
    get,
    path = "/api/courses",
    params(CourseQuery),
    responses((status = 200, description = "Courses ordered by NSQF level", body = SuccessMany<NsqfCourse>)),
    tag = "courses"
)]
pub async fn list(State(state): State<AppState>, Query(query): Query<CourseQuery>) -> Result<impl IntoResponse, AppError> {
    let courses = CatalogService::list_courses(&state.pool, &query).await?;
    Ok(success_many(courses))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    params(("id" = i64, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = SuccessOne<NsqfCourse>),
        (status = 404, description = "Course not found"),
    ),
    tag = "courses"
)]
pub async fn read(State(state): State<AppState>, Path(id): Path<i64>) -> Result<impl IntoResponse, AppError> {
    let course = CatalogService::get_course(&state.pool, id).await?;
    Ok(success_one_ok(course))
}

#[utoipa::path(
    get,
    path = "/api/job-roles",
    responses((status = 200, description = "Job roles known to the recommender", body = SuccessMany<JobRole>)),
    tag = "courses"
)]
pub async fn job_roles(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let roles = CatalogService::list_job_roles(&state.pool).await?;
    Ok(success_many(roles))
}
