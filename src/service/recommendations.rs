use crate::error::AppError;
use crate::models::{RecommendationResult, RecommendationRow, RecommendationSnapshot};
use crate::store::now_text;
use sqlx::AnyPool;

/// Stored recommendation results, one row per `POST /api/recommend` against a saved profile.
pub struct RecommendationService;

impl RecommendationService {
    pub async fn create(pool: &AnyPool, profile_id: i64, result: &RecommendationResult) -> Result<i64, AppError> {
        let json = serde_json::to_string(result)
            .map_err(|e| AppError::Internal(format!("encode recommendations: {}", e)))?;
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO recommendations (profile_id, recommendations, created_at) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(profile_id)
        .bind(json)
        .bind(now_text())
        .fetch_one(pool)
        .await?;
        tracing::debug!(recommendation_id = id, profile_id, "recommendation stored");
        Ok(id)
    }

    /// A snapshot whose profile belongs to `user_id`.
    pub async fn get_owned(pool: &AnyPool, user_id: i64, id: i64) -> Result<RecommendationSnapshot, AppError> {
        sqlx::query_as::<_, RecommendationRow>(
            "SELECT r.id, r.profile_id, r.recommendations, r.created_at FROM recommendations r \
             JOIN profiles p ON p.id = r.profile_id WHERE r.id = $1 AND p.user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Recommendation not found".into()))?
        .try_into()
    }

    /// Newest first. Rows created in the same microsecond fall back to id order.
    pub async fn latest_for_profile(
        pool: &AnyPool,
        profile_id: i64,
        limit: Option<u32>,
    ) -> Result<Vec<RecommendationSnapshot>, AppError> {
        const DEFAULT_LIMIT: u32 = 10;
        let limit = i64::from(limit.unwrap_or(DEFAULT_LIMIT).clamp(1, 100));
        sqlx::query_as::<_, RecommendationRow>(
            "SELECT id, profile_id, recommendations, created_at FROM recommendations \
             WHERE profile_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(profile_id)
        .bind(limit)
        .fetch_all(pool)
        .await?
        .into_iter()
        .map(RecommendationSnapshot::try_from)
        .collect()
    }
}
