use crate::error::AppError;
use crate::store::{parse_optional_timestamp, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum LearningPathStatus {
    #[default]
    Draft,
    InProgress,
    Completed,
    Archived,
}

impl LearningPathStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningPathStatus::Draft => "draft",
            LearningPathStatus::InProgress => "in_progress",
            LearningPathStatus::Completed => "completed",
            LearningPathStatus::Archived => "archived",
        }
    }
}

impl FromStr for LearningPathStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(LearningPathStatus::Draft),
            "in_progress" => Ok(LearningPathStatus::InProgress),
            "completed" => Ok(LearningPathStatus::Completed),
            "archived" => Ok(LearningPathStatus::Archived),
            other => Err(AppError::invalid_field("status", format!("unknown status '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Course,
    Article,
    Video,
    Exercise,
    Project,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::Course,
        ItemType::Article,
        ItemType::Video,
        ItemType::Exercise,
        ItemType::Project,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Course => "course",
            ItemType::Article => "article",
            ItemType::Video => "video",
            ItemType::Exercise => "exercise",
            ItemType::Project => "project",
        }
    }
}

impl FromStr for ItemType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| AppError::invalid_field("item_type", format!("unknown item type '{}'", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LearningPathItem {
    pub id: i64,
    pub learning_path_id: i64,
    pub item_type: ItemType,
    pub title: String,
    pub description: Option<String>,
    pub resource_url: Option<String>,
    /// Minutes.
    pub estimated_duration: Option<i64>,
    pub order: i64,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LearningPathItemRow {
    pub id: i64,
    pub learning_path_id: i64,
    pub item_type: String,
    pub title: String,
    pub description: Option<String>,
    pub resource_url: Option<String>,
    pub estimated_duration: Option<i64>,
    pub item_order: i64,
    pub is_completed: i64,
    pub created_at: String,
}

impl TryFrom<LearningPathItemRow> for LearningPathItem {
    type Error = AppError;

    fn try_from(row: LearningPathItemRow) -> Result<Self, Self::Error> {
        Ok(LearningPathItem {
            id: row.id,
            learning_path_id: row.learning_path_id,
            item_type: row.item_type.parse()?,
            title: row.title,
            description: row.description,
            resource_url: row.resource_url,
            estimated_duration: row.estimated_duration,
            order: row.item_order,
            is_completed: row.is_completed != 0,
            created_at: parse_timestamp("learning_path_items.created_at", &row.created_at)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LearningPath {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: LearningPathStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub items: Vec<LearningPathItem>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct LearningPathRow {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl LearningPathRow {
    pub fn into_path(self, items: Vec<LearningPathItem>) -> Result<LearningPath, AppError> {
        Ok(LearningPath {
            id: self.id,
            user_id: self.user_id,
            title: self.title,
            description: self.description,
            status: self.status.parse()?,
            created_at: parse_timestamp("learning_paths.created_at", &self.created_at)?,
            updated_at: parse_optional_timestamp("learning_paths.updated_at", self.updated_at.as_deref())?,
            items,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct LearningPathItemCreate {
    pub item_type: ItemType,
    pub title: String,
    pub description: Option<String>,
    pub resource_url: Option<String>,
    pub estimated_duration: Option<i64>,
    #[serde(default)]
    pub order: i64,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct LearningPathCreate {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: LearningPathStatus,
    #[serde(default)]
    pub items: Vec<LearningPathItemCreate>,
}

/// Partial update; items are managed through the items route.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct LearningPathUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<LearningPathStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct LearningPathQuery {
    #[serde(default)]
    pub skip: u32,
    /// Default 100, max 1000.
    pub limit: Option<u32>,
    pub status: Option<LearningPathStatus>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct GenerateQuery {
    pub topic: String,
    #[serde(default = "default_level")]
    pub current_level: String,
    #[serde(default = "default_commitment")]
    pub time_commitment: String,
}

fn default_level() -> String {
    "beginner".into()
}

fn default_commitment() -> String {
    "medium".into()
}
