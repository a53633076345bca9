//! Request validation. Each check turns a raw request body into a value the services can store.

use crate::error::AppError;
use crate::models::{
    LearningPace, LearningPathCreate, LearningPathItemCreate, LearningPathUpdate, NewProfile, Profile, ProfileInput,
    ProfileUpdate, RegisterRequest, MAX_NSQF_LEVEL, MIN_NSQF_LEVEL,
};
use regex::Regex;
use std::sync::LazyLock;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_CHAT_MESSAGE_CHARS: usize = 4000;
pub const MAX_TITLE_CHARS: usize = 200;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

pub struct RequestValidator;

/// Registration fields after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: Option<String>,
}

impl RequestValidator {
    pub fn profile(input: &ProfileInput) -> Result<NewProfile, AppError> {
        Ok(NewProfile {
            education_level: validate_level(input.education_level)?,
            prior_skills: clean_skills(&input.prior_skills),
            aspirations: validate_aspirations(&input.aspirations)?,
            learning_pace: input.learning_pace.parse()?,
        })
    }

    /// Merge a partial update onto the stored profile. Only present fields are checked.
    pub fn profile_update(existing: &Profile, update: &ProfileUpdate) -> Result<NewProfile, AppError> {
        let mut merged = NewProfile::from(existing);
        if let Some(level) = update.education_level {
            merged.education_level = validate_level(level)?;
        }
        if let Some(skills) = &update.prior_skills {
            merged.prior_skills = clean_skills(skills);
        }
        if let Some(aspirations) = &update.aspirations {
            merged.aspirations = validate_aspirations(aspirations)?;
        }
        if let Some(pace) = &update.learning_pace {
            merged.learning_pace = pace.parse::<LearningPace>()?;
        }
        Ok(merged)
    }

    pub fn registration(req: &RegisterRequest) -> Result<NewUser, AppError> {
        let email = req.email.trim().to_lowercase();
        if !EMAIL_RE.is_match(&email) {
            return Err(AppError::invalid_field("email", "email is not a valid address"));
        }
        if req.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AppError::invalid_field(
                "password",
                format!("password must be at least {} characters", MIN_PASSWORD_LEN),
            ));
        }
        let full_name = req
            .full_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Ok(NewUser {
            email,
            password: req.password.clone(),
            full_name,
        })
    }

    pub fn learning_path(body: &LearningPathCreate) -> Result<(), AppError> {
        validate_title(&body.title)?;
        for item in &body.items {
            Self::learning_path_item(item)?;
        }
        Ok(())
    }

    pub fn learning_path_update(body: &LearningPathUpdate) -> Result<(), AppError> {
        if let Some(title) = &body.title {
            validate_title(title)?;
        }
        Ok(())
    }

    pub fn learning_path_item(item: &LearningPathItemCreate) -> Result<(), AppError> {
        validate_title(&item.title)?;
        if matches!(item.estimated_duration, Some(d) if d < 0) {
            return Err(AppError::invalid_field(
                "estimated_duration",
                "estimated_duration must not be negative",
            ));
        }
        if item.order < 0 {
            return Err(AppError::invalid_field("order", "order must not be negative"));
        }
        Ok(())
    }

    pub fn chat_message(message: &str) -> Result<(), AppError> {
        if message.trim().is_empty() {
            return Err(AppError::invalid_field("message", "message must not be empty"));
        }
        if message.chars().count() > MAX_CHAT_MESSAGE_CHARS {
            return Err(AppError::invalid_field(
                "message",
                format!("message must be at most {} characters", MAX_CHAT_MESSAGE_CHARS),
            ));
        }
        Ok(())
    }
}

fn validate_level(level: i64) -> Result<i64, AppError> {
    if (MIN_NSQF_LEVEL..=MAX_NSQF_LEVEL).contains(&level) {
        Ok(level)
    } else {
        Err(AppError::invalid_field(
            "education_level",
            format!("education_level must be between {} and {}", MIN_NSQF_LEVEL, MAX_NSQF_LEVEL),
        ))
    }
}

fn validate_aspirations(aspirations: &str) -> Result<String, AppError> {
    let trimmed = aspirations.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field("aspirations", "aspirations must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_title(title: &str) -> Result<(), AppError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid_field("title", "title must not be empty"));
    }
    if trimmed.chars().count() > MAX_TITLE_CHARS {
        return Err(AppError::invalid_field(
            "title",
            format!("title must be at most {} characters", MAX_TITLE_CHARS),
        ));
    }
    Ok(())
}

fn clean_skills(skills: &[String]) -> Vec<String> {
    skills
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
