//! Bundled NSQF catalog and job roles, inserted on first start.

use crate::error::AppError;
use crate::models::{CourseSeed, JobRoleSeed};
use crate::service::CatalogService;
use sqlx::AnyPool;

const NSQF_JSON: &str = include_str!("../data/nsqf.json");
const JOB_ROLES_JSON: &str = include_str!("../data/job_roles.json");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub courses: usize,
    pub job_roles: usize,
}

pub fn bundled_courses() -> Result<Vec<CourseSeed>, AppError> {
    serde_json::from_str(NSQF_JSON).map_err(|e| AppError::Internal(format!("bundled nsqf.json: {}", e)))
}

pub fn bundled_job_roles() -> Result<Vec<JobRoleSeed>, AppError> {
    serde_json::from_str(JOB_ROLES_JSON).map_err(|e| AppError::Internal(format!("bundled job_roles.json: {}", e)))
}

/// Fill each catalog table that is still empty. Tables with rows are left untouched.
pub async fn seed_catalog(pool: &AnyPool) -> Result<SeedReport, AppError> {
    let courses = if CatalogService::count_courses(pool).await? == 0 {
        bundled_courses()?
    } else {
        Vec::new()
    };
    let roles = if CatalogService::count_job_roles(pool).await? == 0 {
        bundled_job_roles()?
    } else {
        Vec::new()
    };
    let report = SeedReport {
        courses: courses.len(),
        job_roles: roles.len(),
    };
    if report == SeedReport::default() {
        tracing::debug!("catalog already seeded");
        return Ok(report);
    }
    CatalogService::insert_catalog(pool, &courses, &roles).await?;
    tracing::info!(courses = report.courses, job_roles = report.job_roles, "catalog seeded");
    Ok(report)
}
