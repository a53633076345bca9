use crate::error::AppError;
use crate::models::{NewProfile, Profile, ProfileRow};
use crate::store::now_text;
use sqlx::AnyPool;

const PROFILE_COLUMNS: &str =
    "id, user_id, education_level, prior_skills, aspirations, learning_pace, created_at, updated_at";

pub struct ProfileService;

impl ProfileService {
    pub async fn create(pool: &AnyPool, user_id: i64, profile: &NewProfile) -> Result<Profile, AppError> {
        let sql = format!(
            "INSERT INTO profiles (user_id, education_level, prior_skills, aspirations, learning_pace, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .bind(profile.education_level)
            .bind(skills_json(&profile.prior_skills)?)
            .bind(&profile.aspirations)
            .bind(profile.learning_pace.as_str())
            .bind(now_text())
            .fetch_one(pool)
            .await?;
        tracing::debug!(profile_id = row.id, user_id, "profile created");
        row.try_into()
    }

    /// A profile owned by `user_id`. Other users' profiles read as missing.
    pub async fn get_owned(pool: &AnyPool, user_id: i64, id: i64) -> Result<Profile, AppError> {
        Self::find_owned(pool, user_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".into()))
    }

    pub async fn find_owned(pool: &AnyPool, user_id: i64, id: i64) -> Result<Option<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE id = $1 AND user_id = $2", PROFILE_COLUMNS);
        sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .map(Profile::try_from)
            .transpose()
    }

    pub async fn list_for_user(pool: &AnyPool, user_id: i64) -> Result<Vec<Profile>, AppError> {
        let sql = format!("SELECT {} FROM profiles WHERE user_id = $1 ORDER BY id", PROFILE_COLUMNS);
        sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id)
            .fetch_all(pool)
            .await?
            .into_iter()
            .map(Profile::try_from)
            .collect()
    }

    /// Overwrite all profile fields with an already merged and validated value.
    pub async fn update(pool: &AnyPool, user_id: i64, id: i64, profile: &NewProfile) -> Result<Profile, AppError> {
        let sql = format!(
            "UPDATE profiles SET education_level = $1, prior_skills = $2, aspirations = $3, \
             learning_pace = $4, updated_at = $5 WHERE id = $6 AND user_id = $7 RETURNING {}",
            PROFILE_COLUMNS
        );
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(profile.education_level)
            .bind(skills_json(&profile.prior_skills)?)
            .bind(&profile.aspirations)
            .bind(profile.learning_pace.as_str())
            .bind(now_text())
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;
        row.try_into()
    }
}

fn skills_json(skills: &[String]) -> Result<String, AppError> {
    serde_json::to_string(skills).map_err(|e| AppError::Internal(format!("encode skills: {}", e)))
}
