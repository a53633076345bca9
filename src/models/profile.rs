use crate::error::AppError;
use crate::store::{parse_optional_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

pub const MIN_NSQF_LEVEL: i64 = 1;
pub const MAX_NSQF_LEVEL: i64 = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LearningPace {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl LearningPace {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningPace::Slow => "slow",
            LearningPace::Normal => "normal",
            LearningPace::Fast => "fast",
        }
    }

    /// Scale factor applied to pathway step durations.
    pub fn duration_multiplier(&self) -> f64 {
        match self {
            LearningPace::Slow => 1.3,
            LearningPace::Normal => 1.0,
            LearningPace::Fast => 0.7,
        }
    }
}

impl FromStr for LearningPace {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "slow" => Ok(LearningPace::Slow),
            "normal" => Ok(LearningPace::Normal),
            "fast" => Ok(LearningPace::Fast),
            _ => Err(AppError::invalid_field(
                "learning_pace",
                "Learning pace must be one of: slow, normal, fast",
            )),
        }
    }
}

impl fmt::Display for LearningPace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Profile {
    pub id: i64,
    pub user_id: Option<i64>,
    pub education_level: i64,
    pub prior_skills: Vec<String>,
    pub aspirations: String,
    pub learning_pace: LearningPace,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct ProfileRow {
    pub id: i64,
    pub user_id: Option<i64>,
    pub education_level: i64,
    pub prior_skills: String,
    pub aspirations: String,
    pub learning_pace: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let prior_skills = serde_json::from_str(&row.prior_skills)
            .map_err(|e| AppError::Internal(format!("bad prior_skills for profile {}: {}", row.id, e)))?;
        Ok(Profile {
            id: row.id,
            user_id: row.user_id,
            education_level: row.education_level,
            prior_skills,
            aspirations: row.aspirations,
            learning_pace: row.learning_pace.parse().map_err(|_| {
                AppError::Internal(format!("bad learning_pace for profile {}: {}", row.id, row.learning_pace))
            })?,
            created_at: parse_timestamp("profiles.created_at", &row.created_at)?,
            updated_at: parse_optional_timestamp("profiles.updated_at", row.updated_at.as_deref())?,
        })
    }
}

/// Profile fields as submitted by a client, before validation.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ProfileInput {
    /// NSQF level (1-10).
    pub education_level: i64,
    pub prior_skills: Vec<String>,
    pub aspirations: String,
    #[serde(default = "default_pace")]
    #[schema(example = "normal")]
    pub learning_pace: String,
}

fn default_pace() -> String {
    LearningPace::Normal.as_str().to_string()
}

/// Validated profile fields, used for inserts and for inline recommendation requests.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProfile {
    pub education_level: i64,
    pub prior_skills: Vec<String>,
    pub aspirations: String,
    pub learning_pace: LearningPace,
}

impl From<&Profile> for NewProfile {
    fn from(p: &Profile) -> Self {
        NewProfile {
            education_level: p.education_level,
            prior_skills: p.prior_skills.clone(),
            aspirations: p.aspirations.clone(),
            learning_pace: p.learning_pace,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfileUpdate {
    pub education_level: Option<i64>,
    pub prior_skills: Option<Vec<String>>,
    pub aspirations: Option<String>,
    pub learning_pace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(pace: &str) -> ProfileRow {
        ProfileRow {
            id: 7,
            user_id: Some(1),
            education_level: 4,
            prior_skills: r#"["python"]"#.into(),
            aspirations: "analyst".into(),
            learning_pace: pace.into(),
            created_at: "2024-01-01T00:00:00+00:00".into(),
            updated_at: None,
        }
    }

    #[test]
    fn stored_pace_is_decoded() {
        let profile = Profile::try_from(row("fast")).unwrap();
        assert_eq!(profile.learning_pace, LearningPace::Fast);
        assert_eq!(profile.prior_skills, vec!["python".to_string()]);
    }

    #[test]
    fn corrupt_stored_pace_is_an_internal_error() {
        match Profile::try_from(row("sprint")) {
            Err(AppError::Internal(message)) => assert!(message.contains("learning_pace")),
            other => panic!("expected internal error, got {:?}", other.map(|p| p.learning_pace)),
        }
    }
}
