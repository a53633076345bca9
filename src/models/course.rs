use crate::error::AppError;
use crate::store::{parse_timestamp, split_list};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// NSQF catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NsqfCourse {
    pub id: i64,
    pub level: i64,
    pub qualification: String,
    pub example_courses: Vec<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct NsqfCourseRow {
    pub id: i64,
    pub level: i64,
    pub qualification: String,
    pub example_courses: String,
    pub description: Option<String>,
    pub created_at: String,
}

impl TryFrom<NsqfCourseRow> for NsqfCourse {
    type Error = AppError;

    fn try_from(row: NsqfCourseRow) -> Result<Self, Self::Error> {
        Ok(NsqfCourse {
            id: row.id,
            level: row.level,
            qualification: row.qualification,
            example_courses: split_list(&row.example_courses),
            description: row.description,
            created_at: parse_timestamp("nsqf_courses.created_at", &row.created_at)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct JobRole {
    pub id: i64,
    pub job_title: String,
    pub skills: Vec<String>,
    pub demand_score: i64,
    pub suggested_microcredentials: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct JobRoleRow {
    pub id: i64,
    pub job_title: String,
    pub skills: String,
    pub demand_score: i64,
    pub suggested_microcredentials: String,
    pub created_at: String,
}

impl TryFrom<JobRoleRow> for JobRole {
    type Error = AppError;

    fn try_from(row: JobRoleRow) -> Result<Self, Self::Error> {
        Ok(JobRole {
            id: row.id,
            job_title: row.job_title,
            skills: split_list(&row.skills),
            demand_score: row.demand_score,
            suggested_microcredentials: split_list(&row.suggested_microcredentials),
            created_at: parse_timestamp("job_roles.created_at", &row.created_at)?,
        })
    }
}

/// Seed file shapes (`data/nsqf.json`, `data/job_roles.json`).
#[derive(Debug, Clone, Deserialize)]
pub struct CourseSeed {
    pub level: i64,
    pub qualification: String,
    pub example_courses: Vec<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobRoleSeed {
    pub job_title: String,
    pub skills: Vec<String>,
    pub demand_score: i64,
    pub suggested_microcredentials: Vec<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct CourseQuery {
    /// Only courses at this NSQF level.
    pub level: Option<i64>,
    /// Default 100, max 1000.
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}
