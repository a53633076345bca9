use crate::error::AppError;
use crate::models::profile::LearningPace;
use crate::models::recommendation::PathwayStep;
use crate::store::parse_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// Profile whose recommendations are used as context.
    pub profile_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    /// The user's original message.
    pub message: String,
    pub response: String,
    pub suggested_responses: Vec<String>,
    /// ISO 8601, UTC.
    pub timestamp: String,
    pub context_used: bool,
}

/// What the assistant knows about the learner. Serialized into the LLM prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChatContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<ContextRecommendation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ContextProfile>,
}

impl ChatContext {
    pub fn is_empty(&self) -> bool {
        self.recommendations.is_none() && self.profile.is_none()
    }

    pub fn latest(&self) -> Option<&ContextRecommendation> {
        self.recommendations.as_ref().and_then(|r| r.first())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextRecommendation {
    pub recommended_job_roles: Vec<String>,
    pub pathway: Vec<PathwayStep>,
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContextProfile {
    pub education_level: i64,
    pub prior_skills: Vec<String>,
    pub aspirations: String,
    pub learning_pace: LearningPace,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ChatLogEntry {
    pub id: i64,
    pub profile_id: Option<i64>,
    pub message: String,
    pub response: String,
    pub context_used: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ChatLogRow {
    pub id: i64,
    pub profile_id: Option<i64>,
    pub message: String,
    pub response: String,
    pub context_used: i64,
    pub created_at: String,
}

impl TryFrom<ChatLogRow> for ChatLogEntry {
    type Error = AppError;

    fn try_from(row: ChatLogRow) -> Result<Self, Self::Error> {
        Ok(ChatLogEntry {
            id: row.id,
            profile_id: row.profile_id,
            message: row.message,
            response: row.response,
            context_used: row.context_used != 0,
            created_at: parse_timestamp("chat_messages.created_at", &row.created_at)?,
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ChatHistoryQuery {
    pub profile_id: Option<i64>,
    /// Default 50, max 500.
    pub limit: Option<u32>,
}
