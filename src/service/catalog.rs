use crate::error::AppError;
use crate::models::{CourseQuery, CourseSeed, JobRole, JobRoleRow, JobRoleSeed, NsqfCourse, NsqfCourseRow};
use crate::store::now_text;
use sqlx::AnyPool;

const COURSE_COLUMNS: &str = "id, level, qualification, example_courses, description, created_at";
const JOB_ROLE_COLUMNS: &str = "id, job_title, skills, demand_score, suggested_microcredentials, created_at";

/// Read access to the NSQF courses and job roles the recommender works from.
pub struct CatalogService;

impl CatalogService {
    /// List courses ordered by level then id; limit (default 100, max 1000), offset (default 0).
    pub async fn list_courses(pool: &AnyPool, query: &CourseQuery) -> Result<Vec<NsqfCourse>, AppError> {
        const DEFAULT_LIMIT: u32 = 100;
        let limit = i64::from(query.limit.unwrap_or(DEFAULT_LIMIT).min(1000));
        let offset = i64::from(query.offset.unwrap_or(0));
        let rows = match query.level {
            Some(level) => {
                let sql = format!(
                    "SELECT {} FROM nsqf_courses WHERE level = $1 ORDER BY level, id LIMIT $2 OFFSET $3",
                    COURSE_COLUMNS
                );
                tracing::debug!(sql = %sql, level, limit, offset, "list courses");
                sqlx::query_as::<_, NsqfCourseRow>(&sql)
                    .bind(level)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM nsqf_courses ORDER BY level, id LIMIT $1 OFFSET $2",
                    COURSE_COLUMNS
                );
                tracing::debug!(sql = %sql, limit, offset, "list courses");
                sqlx::query_as::<_, NsqfCourseRow>(&sql)
                    .bind(limit)
                    .bind(offset)
                    .fetch_all(pool)
                    .await?
            }
        };
        rows.into_iter().map(NsqfCourse::try_from).collect()
    }

    pub async fn get_course(pool: &AnyPool, id: i64) -> Result<NsqfCourse, AppError> {
        let sql = format!("SELECT {} FROM nsqf_courses WHERE id = $1", COURSE_COLUMNS);
        sqlx::query_as::<_, NsqfCourseRow>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".into()))?
            .try_into()
    }

    /// Every course, unpaginated. Input for pathway building.
    pub async fn all_courses(pool: &AnyPool) -> Result<Vec<NsqfCourse>, AppError> {
        let sql = format!("SELECT {} FROM nsqf_courses ORDER BY level, id", COURSE_COLUMNS);
        sqlx::query_as::<_, NsqfCourseRow>(&sql)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(NsqfCourse::try_from)
            .collect()
    }

    /// Job roles in insertion order. The order breaks ties between equally similar roles.
    pub async fn list_job_roles(pool: &AnyPool) -> Result<Vec<JobRole>, AppError> {
        let sql = format!("SELECT {} FROM job_roles ORDER BY id", JOB_ROLE_COLUMNS);
        sqlx::query_as::<_, JobRoleRow>(&sql)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(JobRole::try_from)
            .collect()
    }

    pub async fn count_courses(pool: &AnyPool) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM nsqf_courses")
            .fetch_one(pool)
            .await?)
    }

    pub async fn count_job_roles(pool: &AnyPool) -> Result<i64, AppError> {
        Ok(sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM job_roles")
            .fetch_one(pool)
            .await?)
    }

    /// Insert catalog entries in one transaction. List fields are stored comma-joined.
    pub async fn insert_catalog(pool: &AnyPool, courses: &[CourseSeed], roles: &[JobRoleSeed]) -> Result<(), AppError> {
        let created_at = now_text();
        let mut tx = pool.begin().await?;
        for course in courses {
            sqlx::query(
                "INSERT INTO nsqf_courses (level, qualification, example_courses, description, created_at) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(course.level)
            .bind(&course.qualification)
            .bind(course.example_courses.join(", "))
            .bind(course.description.as_deref())
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }
        for role in roles {
            sqlx::query(
                "INSERT INTO job_roles (job_title, skills, demand_score, suggested_microcredentials, created_at) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(&role.job_title)
            .bind(role.skills.join(", "))
            .bind(role.demand_score)
            .bind(role.suggested_microcredentials.join(", "))
            .bind(&created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }
}
