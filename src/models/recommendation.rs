use crate::error::AppError;
use crate::models::profile::{LearningPace, ProfileInput};
use crate::store::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StepKind {
    Course,
    Certification,
    Internship,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PathwayStep {
    /// Foundational, Core, Micro-credential or On-the-job/Internship.
    pub step: String,
    pub title: String,
    pub description: String,
    pub duration_weeks: u32,
    #[serde(rename = "type")]
    pub kind: StepKind,
    /// NSQF level reached by this step.
    pub level: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct JobRecommendation {
    pub job_title: String,
    /// Combined score in percent, one decimal.
    pub match_score: f64,
    pub pathway: Vec<PathwayStep>,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProfileSummary {
    pub education_level: i64,
    pub skills_count: usize,
    pub learning_pace: LearningPace,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RecommendationResult {
    pub recommendations: Vec<JobRecommendation>,
    pub profile: ProfileSummary,
}

/// Either a stored profile id or an inline profile.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RecommendRequest {
    pub profile_id: Option<i64>,
    pub profile: Option<ProfileInput>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendResponse {
    /// Set when the result was stored against `profile_id`.
    pub recommendation_id: Option<i64>,
    pub recommendations: RecommendationResult,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RecommendationSnapshot {
    pub id: i64,
    pub profile_id: i64,
    pub recommendations: RecommendationResult,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct RecommendationRow {
    pub id: i64,
    pub profile_id: i64,
    pub recommendations: String,
    pub created_at: String,
}

impl TryFrom<RecommendationRow> for RecommendationSnapshot {
    type Error = AppError;

    fn try_from(row: RecommendationRow) -> Result<Self, Self::Error> {
        let recommendations = serde_json::from_str(&row.recommendations)
            .map_err(|e| AppError::Internal(format!("bad snapshot {}: {}", row.id, e)))?;
        Ok(RecommendationSnapshot {
            id: row.id,
            profile_id: row.profile_id,
            recommendations,
            created_at: parse_timestamp("recommendations.created_at", &row.created_at)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
pub struct SnapshotQuery {
    /// Default 10, max 100.
    pub limit: Option<u32>,
}
