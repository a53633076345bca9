use super::{ProfileService, RecommendationService};
use crate::error::AppError;
use crate::models::{
    ChatContext, ChatHistoryQuery, ChatLogEntry, ChatLogRow, ContextProfile, ContextRecommendation,
    RecommendationSnapshot,
};
use crate::store::{format_timestamp, now_text};
use sqlx::AnyPool;

pub struct ChatLogService;

impl ChatLogService {
    pub async fn record(
        pool: &AnyPool,
        user_id: i64,
        profile_id: Option<i64>,
        message: &str,
        response: &str,
        context_used: bool,
    ) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO chat_messages (user_id, profile_id, message, response, context_used, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(user_id)
        .bind(profile_id)
        .bind(message)
        .bind(response)
        .bind(i64::from(context_used))
        .bind(now_text())
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// The caller's exchanges, newest first; limit default 50, max 500.
    pub async fn history(pool: &AnyPool, user_id: i64, query: &ChatHistoryQuery) -> Result<Vec<ChatLogEntry>, AppError> {
        const DEFAULT_LIMIT: u32 = 50;
        let limit = i64::from(query.limit.unwrap_or(DEFAULT_LIMIT).min(500));
        let rows = match query.profile_id {
            Some(profile_id) => {
                sqlx::query_as::<_, ChatLogRow>(
                    "SELECT id, profile_id, message, response, context_used, created_at FROM chat_messages \
                     WHERE user_id = $1 AND profile_id = $2 ORDER BY created_at DESC, id DESC LIMIT $3",
                )
                .bind(user_id)
                .bind(profile_id)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, ChatLogRow>(
                    "SELECT id, profile_id, message, response, context_used, created_at FROM chat_messages \
                     WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
                )
                .bind(user_id)
                .bind(limit)
                .fetch_all(pool)
                .await?
            }
        };
        rows.into_iter().map(ChatLogEntry::try_from).collect()
    }

    /// What the assistant may know about the caller: the profile plus its latest recommendation.
    /// Profiles the caller does not own contribute nothing.
    pub async fn build_context(pool: &AnyPool, user_id: i64, profile_id: Option<i64>) -> Result<ChatContext, AppError> {
        let Some(profile_id) = profile_id else {
            return Ok(ChatContext::default());
        };
        let Some(profile) = ProfileService::find_owned(pool, user_id, profile_id).await? else {
            tracing::debug!(profile_id, user_id, "chat context skipped for unknown profile");
            return Ok(ChatContext::default());
        };
        let latest = RecommendationService::latest_for_profile(pool, profile.id, Some(1)).await?;
        Ok(ChatContext {
            recommendations: latest.first().map(|s| vec![context_recommendation(s)]),
            profile: Some(ContextProfile {
                education_level: profile.education_level,
                prior_skills: profile.prior_skills,
                aspirations: profile.aspirations,
                learning_pace: profile.learning_pace,
            }),
        })
    }
}

fn context_recommendation(snapshot: &RecommendationSnapshot) -> ContextRecommendation {
    let recs = &snapshot.recommendations.recommendations;
    ContextRecommendation {
        recommended_job_roles: recs.iter().map(|r| r.job_title.clone()).collect(),
        pathway: recs.first().map(|r| r.pathway.clone()).unwrap_or_default(),
        generated_at: format_timestamp(snapshot.created_at),
    }
}
